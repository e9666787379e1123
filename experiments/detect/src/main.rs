use minifb::{Key, Window, WindowOptions};
use porch_base::log;
use porch_camera::{Camera, CameraConfig, TestPatternCamera};
use porch_image::draw;
use porch_infer::{load_labels, YoloDetector};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;
const DEFAULT_MODEL: &str = "yolov8n.onnx";

/// Convert HWC RGB buffer to packed ARGB u32 for minifb
fn rgb_to_argb(buf: &[u8], argb: &mut [u32]) {
    for (i, px) in argb.iter_mut().enumerate() {
        let idx = i * 3;
        let r = buf[idx] as u32;
        let g = buf[idx + 1] as u32;
        let b = buf[idx + 2] as u32;
        *px = (r << 16) | (g << 8) | b;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    porch_base::init_stdout_logger();

    let Some(source) = std::env::args().nth(1) else {
        porch_base::log_fatal!("usage: detect <source>  ('test' for the pattern source)");
    };

    let model_path =
        std::env::var("PORCH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    log::info!("Detection Loop");
    log::info!("Source: {}, model: {}", source, model_path);

    let mut detector = YoloDetector::from_file(&model_path)?;
    // One class name per line, as exported alongside the model
    if let Ok(labels_path) = std::env::var("PORCH_LABELS") {
        detector = detector.with_labels(load_labels(&labels_path)?);
        log::info!("Labels loaded from {}", labels_path);
    }

    let config = CameraConfig::default()
        .with_device(source.clone())
        .with_width(WIDTH as u32)
        .with_height(HEIGHT as u32);

    if source == "test" {
        run(TestPatternCamera::new(config), detector).await
    } else {
        #[cfg(feature = "v4l2")]
        {
            run(porch_camera::V4l2Camera::new(config)?, detector).await
        }
        #[cfg(not(feature = "v4l2"))]
        {
            porch_base::log_fatal!("built without v4l2 support; only the 'test' source works");
        }
    }
}

async fn run(
    mut camera: impl Camera,
    detector: YoloDetector,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut window = Window::new(
        "Object Detection - ESC to exit",
        WIDTH,
        HEIGHT,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    let mut argb = vec![0u32; WIDTH * HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut frame = camera.recv().await?;

        let detections = detector.detect(&frame).await?;
        for d in &detections {
            draw::draw_box(&mut frame, d.bbox, draw::class_color(d.class_id), 2);
        }
        if let Some(top) = detections.first() {
            log::info!(
                "{} objects, top: {} ({:.2})",
                detections.len(),
                top.label(detector.labels()).unwrap_or("?"),
                top.confidence
            );
        }

        if frame.shape == vec![HEIGHT, WIDTH, 3] {
            rgb_to_argb(&frame.data, &mut argb);
            window.update_with_buffer(&argb, WIDTH, HEIGHT)?;
        } else {
            log::warn!("Skipping frame with unexpected shape {:?}", frame.shape);
            window.update();
        }
    }

    log::info!("Exiting");
    Ok(())
}
