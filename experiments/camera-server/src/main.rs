use porch_base::log;
use porch_camera::{Camera, CameraConfig, TestPatternCamera};
use porch_http::FrameHub;
use porch_image::Image;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const JPEG_QUALITY: u8 = 80;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    porch_base::init_stdout_logger();

    // Parse camera source from args or use default; "test" selects the
    // synthetic pattern source
    let source = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/video0".to_string());

    log::info!("Camera MJPEG Server");
    log::info!("Source: {}", source);

    let hub = FrameHub::new(16);
    let config = CameraConfig::default()
        .with_device(source.clone())
        .with_width(640)
        .with_height(480);

    let publish_hub = hub.clone();
    if source == "test" {
        let camera = TestPatternCamera::new(config);
        tokio::spawn(publish_frames(camera, publish_hub));
    } else {
        #[cfg(feature = "v4l2")]
        {
            let camera = porch_camera::V4l2Camera::new(config)?;
            log::info!("Camera opened: 640x480");
            tokio::spawn(publish_frames(camera, publish_hub));
        }
        #[cfg(not(feature = "v4l2"))]
        {
            porch_base::log_fatal!("built without v4l2 support; only the 'test' source works");
        }
    }

    porch_http::serve(DEFAULT_ADDR, hub).await?;
    Ok(())
}

async fn publish_frames(mut camera: impl Camera, hub: FrameHub) {
    let mut prev_client_count = 0;

    loop {
        let frame = match camera.recv().await {
            Ok(f) => f,
            Err(e) => {
                log::error!("Capture ended: {}", e);
                break;
            }
        };

        let jpeg = match porch_image::encode_jpeg(Image::U8(frame), JPEG_QUALITY).await {
            Ok(j) => j,
            Err(e) => {
                log::error!("Failed to encode frame: {}", e);
                continue;
            }
        };

        hub.publish(&jpeg);

        let client_count = hub.client_count();
        if client_count != prev_client_count {
            log::info!("Connected clients: {}", client_count);
            prev_client_count = client_count;
        }
    }
}
