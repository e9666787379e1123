//! Image codec utilities for the porch ecosystem.
//!
//! This crate wraps the `image` crate to move JPEG/PNG bytes in and out of
//! `Tensor`-backed frames from `porch-base`.
//!
//! All decoded images use HWC layout: `[height, width, channels]`.

pub mod draw;
pub mod error;
pub mod image;
pub mod jpeg;

pub use error::ImageError;
pub use image::Image;

use crates_image::{DynamicImage, ImageEncoder};
use porch_base::Tensor;

fn to_tensor<T>(
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<T>,
) -> Result<Tensor<T>, ImageError> {
    let shape = vec![height as usize, width as usize, channels];
    Ok(Tensor::new(shape, data)?)
}

fn decode_image_inner(data: &[u8]) -> Result<Image, ImageError> {
    let img = crates_image::load_from_memory(data)?;

    match img {
        DynamicImage::ImageLuma8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 1, buf.into_raw())?))
        }
        DynamicImage::ImageLumaA8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 2, buf.into_raw())?))
        }
        DynamicImage::ImageRgb8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 4, buf.into_raw())?))
        }
        DynamicImage::ImageRgb32F(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::F32(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba32F(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::F32(to_tensor(w, h, 4, buf.into_raw())?))
        }
        _ => {
            // 16-bit and exotic formats collapse to RGBA8
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            Ok(Image::U8(to_tensor(w, h, 4, rgba.into_raw())?))
        }
    }
}

fn encode_jpeg_inner(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (image.width() as u32, image.height() as u32);
    if width == 0 || height == 0 {
        return Err(ImageError::Encode("zero-sized image".to_string()));
    }
    let channels = image.channels();

    let u8_data: Vec<u8> = match image {
        Image::U8(t) => t.data.clone(),
        Image::F32(t) => t
            .data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
            .collect(),
    };

    let (jpeg_data, color_type) = match channels {
        1 => (u8_data, crates_image::ExtendedColorType::L8),
        2 => {
            let stripped: Vec<u8> = u8_data.chunks(2).map(|c| c[0]).collect();
            (stripped, crates_image::ExtendedColorType::L8)
        }
        3 => (u8_data, crates_image::ExtendedColorType::Rgb8),
        4 => {
            let stripped: Vec<u8> = u8_data.chunks(4).flat_map(|c| &c[..3]).copied().collect();
            (stripped, crates_image::ExtendedColorType::Rgb8)
        }
        _ => {
            return Err(ImageError::Encode(format!(
                "unsupported channel count: {channels}"
            )));
        }
    };

    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&jpeg_data, width, height, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Decodes an image from raw bytes into a typed tensor.
///
/// The image format is auto-detected. Returns an `Image` enum that preserves
/// the source pixel precision (u8 or f32), HWC layout.
///
/// The CPU-bound decoding work runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
/// Returns `ImageError::Tensor` if tensor construction fails.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_image_inner(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

/// Encodes an `Image` as JPEG bytes.
///
/// The `quality` parameter controls JPEG compression (1-100, higher = better
/// quality). JPEG supports grayscale (1 channel) and RGB (3 channels); alpha
/// is stripped from 2- and 4-channel input, and F32 images are converted to
/// U8 before encoding.
///
/// The CPU-bound encoding work runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Encode` if the channel count is unsupported or encoding fails.
pub async fn encode_jpeg(image: Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_inner(&image, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}
