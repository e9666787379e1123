use porch_base::Tensor;
use porch_image::{encode_jpeg, jpeg, Image, ImageError};

#[tokio::test]
async fn test_encode_jpeg_roundtrip_dimensions() {
    let tensor = Tensor::new(vec![16, 24, 3], vec![128u8; 16 * 24 * 3]).unwrap();
    let jpeg_bytes = encode_jpeg(Image::U8(tensor), 90).await.unwrap();

    // JPEG magic
    assert_eq!(&jpeg_bytes[..2], &[0xFF, 0xD8]);

    let decoded = jpeg::decode_rgb(&jpeg_bytes).unwrap();
    assert_eq!(decoded.shape, vec![16, 24, 3]);
}

#[tokio::test]
async fn test_encode_jpeg_strips_alpha() {
    let tensor = Tensor::new(vec![4, 4, 4], vec![200u8; 4 * 4 * 4]).unwrap();
    let jpeg_bytes = encode_jpeg(Image::U8(tensor), 80).await.unwrap();
    let decoded = jpeg::decode_rgb(&jpeg_bytes).unwrap();
    assert_eq!(decoded.shape[2], 3);
}

#[tokio::test]
async fn test_encode_jpeg_f32_input() {
    let tensor = Tensor::new(vec![4, 4, 3], vec![0.5f32; 4 * 4 * 3]).unwrap();
    let jpeg_bytes = encode_jpeg(Image::F32(tensor), 90).await.unwrap();
    let decoded = jpeg::decode_rgb(&jpeg_bytes).unwrap();
    // 0.5 scales to ~127; JPEG is lossy so allow a wide band
    let center = decoded.data[(2 * 4 + 2) * 3] as i32;
    assert!((center - 127).abs() < 16, "got {center}");
}

#[tokio::test]
async fn test_encode_jpeg_rejects_zero_size() {
    let tensor = Tensor::new(vec![0, 4, 3], vec![]).unwrap();
    let result = encode_jpeg(Image::U8(tensor), 90).await;
    assert!(matches!(result, Err(ImageError::Encode(_))));
}

#[test]
fn test_rgb_to_jpeg_rejects_short_buffer() {
    let result = jpeg::rgb_to_jpeg(10, 10, &[0u8; 12], 90);
    assert!(matches!(result, Err(ImageError::Encode(_))));
}

#[test]
fn test_tensor_to_jpeg_rejects_wrong_shape() {
    let tensor = Tensor::new(vec![4, 4], vec![0u8; 16]).unwrap();
    assert!(jpeg::tensor_to_jpeg(&tensor, 90).is_err());
}

#[test]
fn test_into_rgb8_from_gray() {
    let gray = Tensor::new(vec![2, 2, 1], vec![10, 20, 30, 40]).unwrap();
    let rgb = Image::U8(gray).into_rgb8().unwrap();
    assert_eq!(rgb.shape, vec![2, 2, 3]);
    assert_eq!(&rgb.data[..3], &[10, 10, 10]);
}
