use crate::{Camera, CameraConfig, CameraError};
use porch_base::Tensor;

/// Deterministic synthetic camera.
///
/// Produces a color gradient with a moving diagonal stripe at the configured
/// size and rate, so every downstream component can run without capture
/// hardware. Frame content is a pure function of the frame index.
#[derive(Debug)]
pub struct TestPatternCamera {
    config: CameraConfig,
    frame_index: u64,
    interval: Option<tokio::time::Interval>,
}

impl TestPatternCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            frame_index: 0,
            interval: None,
        }
    }

    /// Render frame `index` at `width` x `height`.
    pub fn render(width: u32, height: u32, index: u64) -> Tensor<u8> {
        let (w, h) = (width as usize, height as usize);
        let mut data = vec![0u8; h * w * 3];
        let phase = (index * 4) as usize;
        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) * 3;
                data[idx] = (x * 255 / w.max(1)) as u8;
                data[idx + 1] = (y * 255 / h.max(1)) as u8;
                // Moving diagonal stripe
                data[idx + 2] = if (x + y + phase) % 64 < 8 { 255 } else { 32 };
            }
        }
        // Shape is valid by construction
        Tensor::new(vec![h, w, 3], data).unwrap()
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl Camera for TestPatternCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        let fps = self.config.fps().max(1);
        let interval = self.interval.get_or_insert_with(|| {
            tokio::time::interval(std::time::Duration::from_secs(1) / fps)
        });
        interval.tick().await;

        let frame = Self::render(self.config.width(), self.config.height(), self.frame_index);
        self.frame_index += 1;
        Ok(frame)
    }
}
