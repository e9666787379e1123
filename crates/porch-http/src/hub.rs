use crate::mjpeg;
use axum::body::Bytes;
use futures_core::Stream;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Fan-out point between one frame producer and any number of HTTP clients.
///
/// Frames are encoded as multipart parts once, at publish time, and
/// broadcast to every subscriber. A subscriber that falls more than
/// `capacity` parts behind skips the gap and resumes at the live edge;
/// slow clients lose frames, they never stall the producer.
#[derive(Clone)]
pub struct FrameHub {
    tx: broadcast::Sender<Bytes>,
}

impl FrameHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish one JPEG frame to all current subscribers.
    ///
    /// Returns the number of subscribers that will see it. Publishing with
    /// no subscribers is a no-op, not an error.
    pub fn publish(&self, jpeg: &[u8]) -> usize {
        let part = Bytes::from(mjpeg::encode_part(jpeg));
        // send only fails when there are no receivers
        self.tx.send(part).unwrap_or(0)
    }

    /// Open a part stream for one client.
    pub fn subscribe(&self) -> PartStream {
        PartStream {
            inner: BroadcastStream::new(self.tx.subscribe()),
        }
    }

    /// Number of currently subscribed clients.
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for FrameHub {
    fn default() -> Self {
        Self::new(16)
    }
}

/// Stream of encoded multipart parts for one subscriber.
///
/// Lag gaps are skipped silently; the stream ends only when the hub is
/// dropped.
pub struct PartStream {
    inner: BroadcastStream<Bytes>,
}

impl Stream for PartStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(part))) => return Poll::Ready(Some(Ok(part))),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    log::debug!("Client lagged, skipped {} frames", skipped);
                    continue;
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
