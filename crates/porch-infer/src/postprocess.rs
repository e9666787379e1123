use crate::{Detection, InferError, LetterboxInfo};
use porch_base::{Rect, Tensor, Vec2};

/// Intersection over Union of two boxes.
///
/// Returns 0.0 for non-overlapping or zero-area boxes (no division by zero).
pub fn iou(a: &Rect<f32>, b: &Rect<f32>) -> f32 {
    if a.size.x <= 0.0 || a.size.y <= 0.0 || b.size.x <= 0.0 || b.size.y <= 0.0 {
        return 0.0;
    }

    let intersection_area = match a.intersection(*b) {
        Some(rect) => rect.size.x * rect.size.y,
        None => 0.0,
    };

    let union_area = a.area() + b.area() - intersection_area;
    if union_area <= 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Post-process raw YOLO detect-head output.
///
/// The model emits `[1, 4 + num_classes, N]`: rows 0-3 are center-x,
/// center-y, width, height in model space, the remaining rows are per-class
/// scores. For each of the N anchors the best class is taken; anchors below
/// `conf_threshold` are discarded, the rest go through greedy per-class NMS
/// at `iou_threshold`, and surviving boxes are mapped back through the
/// letterbox into source-image coordinates and clamped to the image.
///
/// Returns detections sorted by confidence descending.
pub fn postprocess(
    output: &Tensor<f32>,
    letterbox: &LetterboxInfo,
    original_hw: (usize, usize),
    conf_threshold: f32,
    iou_threshold: f32,
) -> Result<Vec<Detection>, InferError> {
    if output.shape.len() != 3 || output.shape[0] != 1 || output.shape[1] <= 4 {
        return Err(InferError::Shape {
            expected: "[1, 4 + num_classes, N]".to_string(),
            got: format!("{:?}", output.shape),
        });
    }

    let num_classes = output.shape[1] - 4;
    let n = output.shape[2];
    if n == 0 {
        return Ok(Vec::new());
    }

    let (orig_h, orig_w) = (original_hw.0 as f32, original_hw.1 as f32);

    // Row-major [1, rows, N]: element [0, row, col] sits at row * N + col
    let at = |row: usize, col: usize| output.data[row * n + col];

    let mut candidates: Vec<Detection> = Vec::new();
    for i in 0..n {
        let mut class_id = 0;
        let mut confidence = f32::MIN;
        for c in 0..num_classes {
            let score = at(4 + c, i);
            if score > confidence {
                confidence = score;
                class_id = c;
            }
        }
        if confidence < conf_threshold {
            continue;
        }

        // Undo the letterbox: model space -> source image space
        let cx = (at(0, i) - letterbox.pad_x) / letterbox.scale;
        let cy = (at(1, i) - letterbox.pad_y) / letterbox.scale;
        let w = at(2, i) / letterbox.scale;
        let h = at(3, i) / letterbox.scale;

        let x0 = (cx - w / 2.0).clamp(0.0, orig_w);
        let y0 = (cy - h / 2.0).clamp(0.0, orig_h);
        let x1 = (cx + w / 2.0).clamp(0.0, orig_w);
        let y1 = (cy + h / 2.0).clamp(0.0, orig_h);

        candidates.push(Detection {
            bbox: Rect::from_min_max(Vec2::new(x0, y0), Vec2::new(x1, y1)),
            class_id,
            confidence,
        });
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Greedy per-class NMS
    let mut keep: Vec<Detection> = Vec::new();
    for candidate in candidates {
        let suppressed = keep.iter().any(|kept| {
            kept.class_id == candidate.class_id
                && iou(&kept.bbox, &candidate.bbox) > iou_threshold
        });
        if !suppressed {
            keep.push(candidate);
        }
    }

    Ok(keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NC: usize = 3;

    /// Build a `[1, 4 + NC, N]` output tensor from (cx, cy, w, h, scores).
    fn make_output(anchors: &[([f32; 4], [f32; NC])]) -> Tensor<f32> {
        let n = anchors.len();
        let rows = 4 + NC;
        let mut data = vec![0.0f32; rows * n];
        for (i, (bbox, scores)) in anchors.iter().enumerate() {
            for (row, &v) in bbox.iter().enumerate() {
                data[row * n + i] = v;
            }
            for (c, &s) in scores.iter().enumerate() {
                data[(4 + c) * n + i] = s;
            }
        }
        Tensor::new(vec![1, rows, n], data).unwrap()
    }

    fn no_letterbox() -> LetterboxInfo {
        LetterboxInfo {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
        }
    }

    #[test]
    fn test_iou_identical_boxes() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!((iou(&r, &r) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_disjoint_boxes() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0));
        let b = Rect::new(Vec2::new(20.0, 20.0), Vec2::new(5.0, 5.0));
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_iou_zero_area_box() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        let b = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_confidence_filter() {
        let output = make_output(&[
            ([100.0, 100.0, 50.0, 50.0], [0.9, 0.0, 0.0]),
            ([300.0, 300.0, 50.0, 50.0], [0.1, 0.05, 0.0]),
        ]);

        let detections =
            postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_id, 0);
        assert!((detections[0].confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_class_argmax() {
        let output = make_output(&[([100.0, 100.0, 50.0, 50.0], [0.2, 0.7, 0.4])]);

        let detections =
            postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_id, 1);
    }

    #[test]
    fn test_nms_suppresses_same_class_overlap() {
        // Two near-identical boxes of the same class; one survives
        let output = make_output(&[
            ([100.0, 100.0, 50.0, 50.0], [0.9, 0.0, 0.0]),
            ([102.0, 102.0, 50.0, 50.0], [0.8, 0.0, 0.0]),
        ]);

        let detections =
            postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert!((detections[0].confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_nms_keeps_different_classes() {
        let output = make_output(&[
            ([100.0, 100.0, 50.0, 50.0], [0.9, 0.0, 0.0]),
            ([102.0, 102.0, 50.0, 50.0], [0.0, 0.8, 0.0]),
        ]);

        let detections =
            postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 2);
    }

    #[test]
    fn test_letterbox_rescale() {
        // Half-scale with vertical padding: a box at model (320, 320) maps
        // back to source (640, (320 - 140) / 0.5 = 360)
        let letterbox = LetterboxInfo {
            scale: 0.5,
            pad_x: 0.0,
            pad_y: 140.0,
        };
        let output = make_output(&[([320.0, 320.0, 100.0, 100.0], [0.9, 0.0, 0.0])]);

        let detections = postprocess(&output, &letterbox, (720, 1280), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        let bbox = detections[0].bbox;
        // Center back in source space
        let center_x = bbox.origin.x + bbox.size.x / 2.0;
        let center_y = bbox.origin.y + bbox.size.y / 2.0;
        assert!((center_x - 640.0).abs() < 1e-3);
        assert!((center_y - 360.0).abs() < 1e-3);
        // 100 model pixels -> 200 source pixels
        assert!((bbox.size.x - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_boxes_clamped_to_image() {
        // Box hanging past the left/top edge
        let output = make_output(&[([5.0, 5.0, 50.0, 50.0], [0.9, 0.0, 0.0])]);

        let detections =
            postprocess(&output, &no_letterbox(), (480, 640), 0.25, 0.45).unwrap();
        let bbox = detections[0].bbox;
        assert!(bbox.origin.x >= 0.0);
        assert!(bbox.origin.y >= 0.0);
    }

    #[test]
    fn test_empty_output() {
        let output = Tensor::new(vec![1, 4 + NC, 0], vec![]).unwrap();
        let detections =
            postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_rejects_wrong_layout() {
        let output = Tensor::new(vec![4, 2], vec![0.0; 8]).unwrap();
        let err = postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap_err();
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn test_sorted_by_confidence() {
        let output = make_output(&[
            ([100.0, 100.0, 20.0, 20.0], [0.5, 0.0, 0.0]),
            ([300.0, 300.0, 20.0, 20.0], [0.9, 0.0, 0.0]),
            ([500.0, 500.0, 20.0, 20.0], [0.0, 0.7, 0.0]),
        ]);

        let detections =
            postprocess(&output, &no_letterbox(), (640, 640), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 3);
        assert!(detections[0].confidence >= detections[1].confidence);
        assert!(detections[1].confidence >= detections[2].confidence);
    }
}
