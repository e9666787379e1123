use porch_base::log;
use porch_http::FrameHub;
use porch_net::FrameReceiver;
use std::path::PathBuf;

const DEFAULT_LISTEN: &str = "127.0.0.1:8888";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    porch_base::init_stdout_logger();

    let listen = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());

    // Optional on-disk dump of every reassembled frame
    let image_dir = std::env::var_os("PORCH_IMAGE_DIR").map(PathBuf::from);

    log::info!("UDP-to-HTTP Relay");
    log::info!("Listening for datagrams on {}", listen);

    let receiver = FrameReceiver::bind(&listen).await?;
    let hub = FrameHub::new(16);

    let relay_hub = hub.clone();
    tokio::spawn(relay_frames(receiver, relay_hub, image_dir));

    porch_http::serve(DEFAULT_HTTP_ADDR, hub).await?;
    Ok(())
}

async fn relay_frames(mut receiver: FrameReceiver, hub: FrameHub, image_dir: Option<PathBuf>) {
    if let Some(dir) = &image_dir {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            log::error!("Failed to create image directory {:?}: {}", dir, e);
            return;
        }
        log::info!("Dumping frames to {}", dir.display());
    }

    let mut frame_count: u64 = 0;
    let mut prev_dropped: u64 = 0;

    loop {
        let frame = match receiver.recv().await {
            Ok(f) => f,
            Err(e) => {
                log::error!("Receive loop ended: {}", e);
                break;
            }
        };

        hub.publish(&frame);

        if let Some(dir) = &image_dir {
            let path = dir.join(format!("{:06}.jpg", frame_count));
            if let Err(e) = tokio::fs::write(&path, &frame).await {
                log::warn!("Failed to write {}: {}", path.display(), e);
            }
        }

        frame_count += 1;

        let dropped = receiver.frames_dropped();
        if dropped != prev_dropped {
            log::warn!(
                "Dropped {} incomplete frames ({} completed)",
                dropped,
                receiver.frames_completed()
            );
            prev_dropped = dropped;
        }
    }
}
