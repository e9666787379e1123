use std::fmt;

#[derive(Debug)]
pub enum InferError {
    ModelLoad(String),
    Shape { expected: String, got: String },
    Runtime(String),
    Io(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Shape { expected, got } => {
                write!(f, "shape error: expected {expected}, got {got}")
            }
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<porch_base::TensorError> for InferError {
    fn from(err: porch_base::TensorError) -> Self {
        InferError::Runtime(err.to_string())
    }
}
