use crate::{labels, postprocess, preprocess, Detection, InferError};
use ndarray::ArrayD;
use ort::{inputs, session::Session, value::TensorRef};
use porch_base::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// YOLO object detector backed by an ONNX Runtime session.
///
/// Thresholds default to confidence 0.25 and NMS IoU 0.45.
pub struct YoloDetector {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
    labels: Vec<String>,
    conf_threshold: f32,
    nms_threshold: f32,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("labels", &self.labels.len())
            .field("conf_threshold", &self.conf_threshold)
            .field("nms_threshold", &self.nms_threshold)
            .finish()
    }
}

impl YoloDetector {
    /// Load a YOLO detection model from an ONNX file, CPU execution.
    ///
    /// # Errors
    ///
    /// Returns `InferError::ModelLoad` if the session cannot be built or the
    /// model declares no inputs/outputs.
    pub fn from_file(model_path: impl AsRef<Path>) -> Result<Self, InferError> {
        let builder = Session::builder()
            .map_err(|e| InferError::ModelLoad(format!("failed to create session builder: {e}")))?;

        let session = builder
            .commit_from_file(model_path.as_ref())
            .map_err(|e| InferError::ModelLoad(format!("failed to load model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| InferError::ModelLoad("model declares no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|output| output.name().to_string())
            .ok_or_else(|| InferError::ModelLoad("model declares no outputs".to_string()))?;

        log::debug!(
            "Model loaded: input '{}', output '{}'",
            input_name,
            output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            labels: labels::coco_labels(),
            conf_threshold: 0.25,
            nms_threshold: 0.45,
        })
    }

    /// Replace the builtin COCO label table.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Set confidence and NMS thresholds.
    pub fn with_thresholds(mut self, conf: f32, nms: f32) -> Self {
        self.conf_threshold = conf;
        self.nms_threshold = nms;
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Run detection on an RGB frame (HWC `Tensor<u8>`).
    ///
    /// Preprocesses on the caller's task, runs the session on the blocking
    /// pool, and returns detections in source-image coordinates sorted by
    /// confidence.
    pub async fn detect(&self, frame: &Tensor<u8>) -> Result<Vec<Detection>, InferError> {
        if frame.shape.len() != 3 {
            return Err(InferError::Shape {
                expected: "[H, W, 3]".to_string(),
                got: format!("{:?}", frame.shape),
            });
        }
        let original_hw = (frame.shape[0], frame.shape[1]);

        let as_f32 = Tensor::new(
            frame.shape.clone(),
            frame.data.iter().map(|&v| v as f32).collect(),
        )?;
        let (input, letterbox) = preprocess(&as_f32)?;

        let session = Arc::clone(&self.session);
        let input_name = self.input_name.clone();
        let output_name = self.output_name.clone();

        let output = tokio::task::spawn_blocking(move || -> Result<Tensor<f32>, InferError> {
            let array = ArrayD::from_shape_vec(input.shape.clone(), input.data)
                .map_err(|e| InferError::Runtime(format!("failed to create ndarray: {e}")))?;
            let tensor_ref = TensorRef::from_array_view(array.view())
                .map_err(|e| InferError::Runtime(format!("failed to create tensor ref: {e}")))?;

            let mut session = session.lock().unwrap_or_else(|e| e.into_inner());
            let outputs = session
                .run(inputs![input_name.as_str() => tensor_ref])
                .map_err(|e| InferError::Runtime(format!("inference failed: {e}")))?;

            let value = &outputs[output_name.as_str()];
            let array = value
                .try_extract_array::<f32>()
                .map_err(|e| InferError::Runtime(format!("output is not f32: {e}")))?;

            Ok(Tensor::new(
                array.shape().to_vec(),
                array.iter().copied().collect(),
            )?)
        })
        .await
        .map_err(|e| InferError::Runtime(format!("inference task failed: {e}")))??;

        postprocess(
            &output,
            &letterbox,
            original_hw,
            self.conf_threshold,
            self.nms_threshold,
        )
    }
}
