use porch_camera::{Camera, CameraConfig, TestPatternCamera};

#[tokio::test]
async fn test_pattern_respects_config_size() {
    let config = CameraConfig::default()
        .with_width(80)
        .with_height(60)
        .with_fps(1000);
    let mut cam = TestPatternCamera::new(config);

    let frame = cam.recv().await.unwrap();
    assert_eq!(frame.shape, vec![60, 80, 3]);
}

#[tokio::test]
async fn test_pattern_advances_each_recv() {
    let config = CameraConfig::default()
        .with_width(32)
        .with_height(32)
        .with_fps(1000);
    let mut cam = TestPatternCamera::new(config);

    let a = cam.recv().await.unwrap();
    let b = cam.recv().await.unwrap();
    assert_ne!(a.data, b.data);
}

#[tokio::test]
async fn test_pattern_feeds_jpeg_encoder() {
    // The full capture-to-JPEG path used by the server experiments
    let config = CameraConfig::default()
        .with_width(64)
        .with_height(48)
        .with_fps(1000);
    let mut cam = TestPatternCamera::new(config);

    let frame = cam.recv().await.unwrap();
    let jpeg = porch_image::jpeg::tensor_to_jpeg(&frame, 80).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let back = porch_image::jpeg::decode_rgb(&jpeg).unwrap();
    assert_eq!(back.shape, vec![48, 64, 3]);
}
