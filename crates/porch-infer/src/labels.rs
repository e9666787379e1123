use crate::InferError;
use std::path::Path;

/// COCO class names in YOLO output order.
#[rustfmt::skip]
pub const COCO_CLASS_LABELS: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat", "traffic light",
    "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog", "horse", "sheep", "cow", "elephant",
    "bear", "zebra", "giraffe", "backpack", "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard",
    "sports ball", "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange", "broccoli",
    "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant", "bed", "dining table", "toilet",
    "tv", "laptop", "mouse", "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush"
];

/// The builtin COCO table as owned strings.
pub fn coco_labels() -> Vec<String> {
    COCO_CLASS_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Load class names from a plain text file, one name per line.
///
/// Blank lines are skipped, surrounding whitespace is trimmed.
///
/// # Errors
///
/// Returns `InferError::Io` if the file cannot be read, and
/// `InferError::ModelLoad` if it contains no names at all.
pub fn load_labels(path: impl AsRef<Path>) -> Result<Vec<String>, InferError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let labels: Vec<String> = content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if labels.is_empty() {
        return Err(InferError::ModelLoad(format!(
            "no class names in {}",
            path.as_ref().display()
        )));
    }
    Ok(labels)
}
