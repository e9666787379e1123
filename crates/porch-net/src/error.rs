use std::fmt;

#[derive(Debug)]
pub enum NetError {
    Io(std::io::Error),
    BadMagic(u32),
    Truncated(usize),
    LengthMismatch { header: u16, actual: usize },
    InvalidChunk { index: u16, count: u16 },
    ChunkCountMismatch { frame_id: u32, expected: u16, got: u16 },
    FrameTooLarge(usize),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Io(err) => write!(f, "io error: {err}"),
            NetError::BadMagic(got) => write!(f, "bad magic: {got:#010x}"),
            NetError::Truncated(len) => write!(f, "datagram too short: {len} bytes"),
            NetError::LengthMismatch { header, actual } => {
                write!(
                    f,
                    "payload length mismatch: header says {header}, datagram carries {actual}"
                )
            }
            NetError::InvalidChunk { index, count } => {
                write!(f, "invalid chunk: index {index} of {count}")
            }
            NetError::ChunkCountMismatch {
                frame_id,
                expected,
                got,
            } => {
                write!(
                    f,
                    "chunk count changed mid-frame {frame_id}: {expected} then {got}"
                )
            }
            NetError::FrameTooLarge(len) => write!(f, "frame too large to chunk: {len} bytes"),
        }
    }
}

impl std::error::Error for NetError {}

impl From<std::io::Error> for NetError {
    fn from(err: std::io::Error) -> Self {
        NetError::Io(err)
    }
}
