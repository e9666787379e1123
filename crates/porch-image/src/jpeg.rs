//! Synchronous JPEG helpers for capture threads that cannot await.

use crate::{Image, ImageError};
use crates_image::ImageEncoder;
use porch_base::Tensor;

/// Encode a packed RGB8 buffer as JPEG.
pub fn rgb_to_jpeg(
    width: u32,
    height: u32,
    data: &[u8],
    quality: u8,
) -> Result<Vec<u8>, ImageError> {
    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
        return Err(ImageError::Encode(format!(
            "RGB buffer length {} does not match {}x{}",
            data.len(),
            width,
            height
        )));
    }
    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(data, width, height, crates_image::ExtendedColorType::Rgb8)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Decode image bytes straight to an RGB8 tensor `[height, width, 3]`.
///
/// Grayscale and alpha-carrying input is expanded/stripped to RGB, so callers
/// always get 3 channels. This is the path camera capture threads use on
/// MJPEG frames.
pub fn decode_rgb(data: &[u8]) -> Result<Tensor<u8>, ImageError> {
    let img = crates_image::load_from_memory(data)?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    Ok(Tensor::new(
        vec![h as usize, w as usize, 3],
        rgb.into_raw(),
    )?)
}

/// Encode an RGB8 tensor `[height, width, 3]` as JPEG.
pub fn tensor_to_jpeg(frame: &Tensor<u8>, quality: u8) -> Result<Vec<u8>, ImageError> {
    if frame.shape.len() != 3 || frame.shape[2] != 3 {
        return Err(ImageError::Encode(format!(
            "expected [H, W, 3] tensor, got shape {:?}",
            frame.shape
        )));
    }
    rgb_to_jpeg(
        frame.shape[1] as u32,
        frame.shape[0] as u32,
        &frame.data,
        quality,
    )
}

impl Image {
    /// Convert the image to an RGB8 tensor `[height, width, 3]`.
    ///
    /// Grayscale is replicated across channels, alpha is stripped, F32 is
    /// clamped to [0, 1] and scaled to u8.
    pub fn into_rgb8(self) -> Result<Tensor<u8>, ImageError> {
        let (h, w, channels) = (self.height(), self.width(), self.channels());

        let u8_data: Vec<u8> = match self {
            Image::U8(t) => t.data,
            Image::F32(t) => t
                .data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
                .collect(),
        };

        let rgb: Vec<u8> = match channels {
            1 => u8_data.iter().flat_map(|&v| [v, v, v]).collect(),
            2 => u8_data.chunks(2).flat_map(|c| [c[0], c[0], c[0]]).collect(),
            3 => u8_data,
            4 => u8_data.chunks(4).flat_map(|c| [c[0], c[1], c[2]]).collect(),
            _ => {
                return Err(ImageError::Decode(format!(
                    "unsupported channel count: {channels}"
                )));
            }
        };

        Ok(Tensor::new(vec![h, w, 3], rgb)?)
    }
}
