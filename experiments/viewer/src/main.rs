use minifb::{Key, Window, WindowOptions};
use porch_base::{log, Tensor};
use porch_camera::{Camera, CameraConfig, TestPatternCamera};
use porch_image::draw;
use porch_infer::YoloDetector;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

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

    let sources: Vec<String> = std::env::args().skip(1).collect();
    if sources.is_empty() {
        porch_base::log_fatal!("usage: viewer <source> [source...]  ('test' for the pattern source)");
    }

    let model_path = std::env::var("PORCH_MODEL").ok();
    if model_path.is_none() {
        log::warn!("PORCH_MODEL not set, running without detection");
    }

    log::info!("Multi-Stream Viewer");
    log::info!("Sources: {:?}", sources);

    // One capture/detect task per source, latest-wins channel to the UI
    let mut streams = Vec::new();
    for source in &sources {
        let (tx, rx) = mpsc::channel::<Tensor<u8>>(1);
        tokio::spawn(stream_task(source.clone(), model_path.clone(), tx));
        streams.push((source.clone(), rx));
    }

    // All windows live on the main thread
    let mut windows = Vec::new();
    for (source, rx) in streams {
        let mut window = Window::new(
            &format!("{} - ESC to exit", source),
            WIDTH,
            HEIGHT,
            WindowOptions::default(),
        )?;
        window.set_target_fps(60);
        windows.push((window, rx, vec![0u32; WIDTH * HEIGHT]));
    }

    loop {
        let mut any_open = false;
        for (window, rx, argb) in windows.iter_mut() {
            if !window.is_open() || window.is_key_down(Key::Escape) {
                continue;
            }
            any_open = true;

            // Drain the channel so the newest frame is shown
            let mut latest = None;
            while let Ok(frame) = rx.try_recv() {
                latest = Some(frame);
            }

            match latest {
                Some(frame) if frame.shape == vec![HEIGHT, WIDTH, 3] => {
                    rgb_to_argb(&frame.data, argb);
                    window.update_with_buffer(argb, WIDTH, HEIGHT)?;
                }
                Some(frame) => {
                    log::warn!(
                        "Frame dimension mismatch: expected {}x{}, got {:?}",
                        WIDTH,
                        HEIGHT,
                        frame.shape
                    );
                    window.update();
                }
                None => window.update(),
            }
        }

        if !any_open {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    log::info!("All windows closed, exiting");
    Ok(())
}

async fn stream_task(source: String, model_path: Option<String>, tx: mpsc::Sender<Tensor<u8>>) {
    let detector = match &model_path {
        Some(path) => match YoloDetector::from_file(path) {
            Ok(d) => Some(d),
            Err(e) => {
                log::warn!("{}: failed to load model: {}", source, e);
                None
            }
        },
        None => None,
    };

    let config = CameraConfig::default()
        .with_device(source.clone())
        .with_width(WIDTH as u32)
        .with_height(HEIGHT as u32);

    if source == "test" {
        run_stream(TestPatternCamera::new(config), detector, &source, tx).await;
    } else {
        #[cfg(feature = "v4l2")]
        match porch_camera::V4l2Camera::new(config) {
            Ok(camera) => run_stream(camera, detector, &source, tx).await,
            Err(e) => log::error!("{}: failed to open camera: {}", source, e),
        }
        #[cfg(not(feature = "v4l2"))]
        log::error!("{}: built without v4l2 support", source);
    }
}

async fn run_stream(
    mut camera: impl Camera,
    detector: Option<YoloDetector>,
    source: &str,
    tx: mpsc::Sender<Tensor<u8>>,
) {
    loop {
        let mut frame = match camera.recv().await {
            Ok(f) => f,
            Err(e) => {
                log::error!("{}: capture ended: {}", source, e);
                break;
            }
        };

        if let Some(detector) = &detector {
            match detector.detect(&frame).await {
                Ok(detections) => {
                    for d in &detections {
                        draw::draw_box(&mut frame, d.bbox, draw::class_color(d.class_id), 2);
                    }
                    if let Some(top) = detections.first() {
                        log::debug!(
                            "{}: {} objects, top {} ({:.2})",
                            source,
                            detections.len(),
                            top.label(detector.labels()).unwrap_or("?"),
                            top.confidence
                        );
                    }
                }
                Err(e) => log::warn!("{}: detection failed: {}", source, e),
            }
        }

        // Latest frame wins; a full channel means the UI is behind, so the
        // frame is dropped rather than queued
        match tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => break,
        }
    }
}
