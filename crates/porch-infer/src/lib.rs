//! Object detection for the porch ecosystem.
//!
//! Runs YOLO-family ONNX detection models through `ort`: letterbox
//! preprocessing, session execution on the blocking pool, and
//! confidence-filter + NMS postprocessing back into source-image
//! coordinates.

pub mod detector;
pub mod error;
pub mod labels;
pub mod postprocess;
pub mod preprocess;
pub mod types;

pub use detector::YoloDetector;
pub use error::InferError;
pub use labels::{load_labels, COCO_CLASS_LABELS};
pub use postprocess::{iou, postprocess};
pub use preprocess::{preprocess, LetterboxInfo};
pub use types::Detection;
