use crates_image::ImageEncoder;
use porch_image::{decode_image, jpeg, Image};

fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = crates_image::RgbImage::from_fn(width, height, |x, y| {
        let val = ((x + y) % 256) as u8;
        crates_image::Rgb([val, val.wrapping_add(16), val.wrapping_add(32)])
    });
    let mut buffer = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new(&mut buffer)
        .encode_image(&img)
        .unwrap();
    buffer
}

#[tokio::test]
async fn test_decode_jpeg_rgb() {
    let buffer = synthetic_jpeg(4, 2);

    let decoded = decode_image(&buffer).await.unwrap();
    match decoded {
        Image::U8(ref tensor) => {
            assert_eq!(tensor.shape, vec![2, 4, 3]);
        }
        _ => panic!("Expected U8 variant"),
    }
    assert_eq!(decoded.height(), 2);
    assert_eq!(decoded.width(), 4);
    assert_eq!(decoded.channels(), 3);
}

#[tokio::test]
async fn test_decode_png_rgba() {
    let img = crates_image::RgbaImage::from_fn(2, 2, |x, y| {
        let val = (x + y) as u8 * 64;
        crates_image::Rgba([val, val + 16, val + 32, 255])
    });
    let mut buffer = Vec::new();
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 2, 2, crates_image::ExtendedColorType::Rgba8)
        .unwrap();

    let decoded = decode_image(&buffer).await.unwrap();
    match decoded {
        Image::U8(ref tensor) => assert_eq!(tensor.shape, vec![2, 2, 4]),
        _ => panic!("Expected U8 variant"),
    }
}

#[tokio::test]
async fn test_decode_garbage_errors() {
    let result = decode_image(b"not an image at all").await;
    assert!(result.is_err());
}

#[test]
fn test_decode_rgb_always_three_channels() {
    // Grayscale JPEG comes back as [h, w, 3]
    let img = crates_image::GrayImage::from_fn(8, 8, |x, y| {
        crates_image::Luma([((x + y) % 256) as u8])
    });
    let mut buffer = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new(&mut buffer)
        .encode_image(&img)
        .unwrap();

    let tensor = jpeg::decode_rgb(&buffer).unwrap();
    assert_eq!(tensor.shape, vec![8, 8, 3]);
}

#[test]
fn test_decode_rgb_rejects_garbage() {
    assert!(jpeg::decode_rgb(&[0u8; 16]).is_err());
}
