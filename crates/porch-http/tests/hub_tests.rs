use futures_util::StreamExt;
use porch_http::FrameHub;
use tokio::time::{timeout, Duration};

#[tokio::test]
async fn test_publish_without_subscribers_is_noop() {
    let hub = FrameHub::new(4);
    assert_eq!(hub.publish(b"jpeg"), 0);
    assert_eq!(hub.client_count(), 0);
}

#[tokio::test]
async fn test_subscriber_receives_encoded_part() {
    let hub = FrameHub::new(4);
    let mut stream = hub.subscribe();
    assert_eq!(hub.client_count(), 1);

    assert_eq!(hub.publish(b"jpeg bytes"), 1);

    let part = timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("stream timed out")
        .expect("stream ended")
        .expect("stream errored");

    assert!(part.starts_with(b"--frame\r\n"));
    assert!(part.ends_with(b"jpeg bytes\r\n"));
}

#[tokio::test]
async fn test_multiple_subscribers_see_same_frame() {
    let hub = FrameHub::new(4);
    let mut a = hub.subscribe();
    let mut b = hub.subscribe();

    assert_eq!(hub.publish(b"frame-1"), 2);

    let part_a = timeout(Duration::from_secs(5), a.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let part_b = timeout(Duration::from_secs(5), b.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(part_a, part_b);
}

#[tokio::test]
async fn test_lagged_subscriber_skips_to_live_edge() {
    let hub = FrameHub::new(2);
    let mut stream = hub.subscribe();

    // Publish far past the channel capacity before the client reads
    for i in 0..10u8 {
        hub.publish(&[i]);
    }

    // The client skips the gap and still gets the retained frames
    let part = timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("stream timed out")
        .expect("stream ended")
        .expect("stream errored");
    assert!(part.starts_with(b"--frame\r\n"));
}

#[tokio::test]
async fn test_stream_ends_when_hub_dropped() {
    let hub = FrameHub::new(4);
    let mut stream = hub.subscribe();
    drop(hub);

    let next = timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("stream timed out");
    assert!(next.is_none());
}
