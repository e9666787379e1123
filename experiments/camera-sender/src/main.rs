use porch_base::log;
use porch_camera::{Camera, CameraConfig, TestPatternCamera};
use porch_image::Image;
use porch_net::FrameSender;

const DEFAULT_TARGET: &str = "127.0.0.1:8888";
const JPEG_QUALITY: u8 = 80;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    porch_base::init_stdout_logger();

    let source = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/video0".to_string());
    let target = std::env::args()
        .nth(2)
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());

    log::info!("Camera Datagram Sender");
    log::info!("Source: {}, target: {}", source, target);

    let config = CameraConfig::default()
        .with_device(source.clone())
        .with_width(640)
        .with_height(480);

    let sender = FrameSender::connect(&target).await?;
    log::info!("Sending from {}", sender.local_addr()?);

    if source == "test" {
        send_frames(TestPatternCamera::new(config), sender).await;
    } else {
        #[cfg(feature = "v4l2")]
        {
            let camera = porch_camera::V4l2Camera::new(config)?;
            log::info!("Camera opened: 640x480");
            send_frames(camera, sender).await;
        }
        #[cfg(not(feature = "v4l2"))]
        {
            porch_base::log_fatal!("built without v4l2 support; only the 'test' source works");
        }
    }

    Ok(())
}

async fn send_frames(mut camera: impl Camera, mut sender: FrameSender) {
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

        if let Err(e) = sender.send(&jpeg).await {
            log::warn!("Failed to send frame: {}", e);
        }
    }
}
