use porch_base::Rect;

/// One detected object in source-image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box, origin at top-left of the source image.
    pub bbox: Rect<f32>,
    /// Index into the model's class table.
    pub class_id: usize,
    /// Confidence score in [0.0, 1.0].
    pub confidence: f32,
}

impl Detection {
    /// Class name from a label table, or `None` when the id is out of range.
    pub fn label<'a>(&self, labels: &'a [String]) -> Option<&'a str> {
        labels.get(self.class_id).map(|s| s.as_str())
    }
}
