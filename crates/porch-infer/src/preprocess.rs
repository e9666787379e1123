use crate::InferError;
use porch_base::Tensor;

const TARGET_SIZE: usize = 640;
const PAD_COLOR: f32 = 114.0 / 255.0; // Gray padding in normalized range

/// Letterbox transformation parameters for mapping model-space coordinates
/// back to the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale applied to the image: min(640/W, 640/H)
    pub scale: f32,
    /// Horizontal padding in model-space pixels
    pub pad_x: f32,
    /// Vertical padding in model-space pixels
    pub pad_y: f32,
}

/// Preprocess a frame for YOLO inference.
///
/// Takes an HWC tensor (`[height, width, 3]`, values 0-255) and returns an
/// NCHW tensor (`[1, 3, 640, 640]`, values 0-1): letterbox resize keeping
/// aspect ratio, gray padding, nearest-neighbor interpolation.
///
/// Returns the tensor and the letterbox parameters needed to rescale model
/// output back to the source image.
pub fn preprocess(image: &Tensor<f32>) -> Result<(Tensor<f32>, LetterboxInfo), InferError> {
    if image.shape.len() != 3 {
        return Err(InferError::Shape {
            expected: "[H, W, 3]".to_string(),
            got: format!("{:?}", image.shape),
        });
    }
    let (h, w, c) = (image.shape[0], image.shape[1], image.shape[2]);
    if c != 3 {
        return Err(InferError::Shape {
            expected: "3 channels".to_string(),
            got: format!("{c} channels"),
        });
    }
    if h == 0 || w == 0 {
        return Err(InferError::Shape {
            expected: "non-zero dimensions".to_string(),
            got: format!("{h}x{w}"),
        });
    }

    let scale = (TARGET_SIZE as f32 / w as f32).min(TARGET_SIZE as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).max(1);
    let new_h = ((h as f32 * scale) as usize).max(1);
    let pad_x = ((TARGET_SIZE - new_w) / 2) as f32;
    let pad_y = ((TARGET_SIZE - new_h) / 2) as f32;

    // Nearest-neighbor resize
    let mut resized = vec![0.0f32; new_h * new_w * 3];
    for out_y in 0..new_h {
        for out_x in 0..new_w {
            let src_y = ((out_y as f32 / scale).floor() as usize).min(h - 1);
            let src_x = ((out_x as f32 / scale).floor() as usize).min(w - 1);
            for ch in 0..3 {
                let src_idx = (src_y * w + src_x) * 3 + ch;
                let dst_idx = (out_y * new_w + out_x) * 3 + ch;
                resized[dst_idx] = image.data[src_idx];
            }
        }
    }

    // Pad to 640x640 and transpose HWC -> NCHW, scaling to 0..1
    let mut nchw = vec![PAD_COLOR; 3 * TARGET_SIZE * TARGET_SIZE];
    let (pad_x_int, pad_y_int) = (pad_x as usize, pad_y as usize);

    for ch in 0..3 {
        for y in 0..new_h {
            for x in 0..new_w {
                let src_idx = (y * new_w + x) * 3 + ch;
                let dst_idx =
                    ch * (TARGET_SIZE * TARGET_SIZE) + (y + pad_y_int) * TARGET_SIZE + (x + pad_x_int);
                nchw[dst_idx] = resized[src_idx] / 255.0;
            }
        }
    }

    let preprocessed = Tensor::new(vec![1, 3, TARGET_SIZE, TARGET_SIZE], nchw)?;
    let letterbox = LetterboxInfo { scale, pad_x, pad_y };

    Ok((preprocessed, letterbox))
}
