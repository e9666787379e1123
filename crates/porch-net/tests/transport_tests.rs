use porch_net::{FrameReceiver, FrameSender, TransportConfig};
use tokio::time::{timeout, Duration};

#[tokio::test]
async fn test_send_recv_single_frame() {
    let mut receiver = FrameReceiver::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = receiver.local_addr().unwrap();

    let mut sender = FrameSender::connect(addr).await.expect("connect failed");

    let frame: Vec<u8> = (0u16..5000).map(|v| (v % 251) as u8).collect();
    sender.send(&frame).await.expect("send failed");

    let received = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(received, frame);
    assert_eq!(receiver.frames_completed(), 1);
}

#[tokio::test]
async fn test_send_recv_multiple_frames_in_order() {
    let mut receiver = FrameReceiver::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = receiver.local_addr().unwrap();

    let mut sender = FrameSender::connect(addr).await.expect("connect failed");

    for i in 0..5u8 {
        let frame = vec![i; 2000];
        sender.send(&frame).await.expect("send failed");

        let received = timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("recv timed out")
            .expect("recv failed");
        assert_eq!(received, frame);
    }
    assert_eq!(receiver.frames_completed(), 5);
}

#[tokio::test]
async fn test_small_frame_fits_one_datagram() {
    let mut receiver = FrameReceiver::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = receiver.local_addr().unwrap();

    let mut sender = FrameSender::connect(addr).await.expect("connect failed");
    sender.send(b"jpeg bytes").await.expect("send failed");

    let received = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(received, b"jpeg bytes");
}

#[tokio::test]
async fn test_receiver_skips_foreign_datagrams() {
    let mut receiver = FrameReceiver::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = receiver.local_addr().unwrap();

    // A raw socket throws garbage at the port first
    let rogue = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    rogue.send_to(b"stray text datagram", addr).await.unwrap();
    rogue.send_to(&[0u8; 32], addr).await.unwrap();

    let mut sender = FrameSender::connect(addr).await.expect("connect failed");
    let frame = vec![42u8; 3000];
    sender.send(&frame).await.expect("send failed");

    // The garbage is skipped, the real frame still arrives
    let received = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(received, frame);
}

#[tokio::test]
async fn test_custom_transport_config() {
    let config = TransportConfig::default().with_max_datagram(256).with_window(2);
    let mut receiver = FrameReceiver::bind_with("127.0.0.1:0", config.clone())
        .await
        .expect("bind failed");
    let addr = receiver.local_addr().unwrap();

    let mut sender = FrameSender::connect_with(addr, config)
        .await
        .expect("connect failed");

    // Forces many small chunks
    let frame: Vec<u8> = (0u16..4000).map(|v| (v % 251) as u8).collect();
    sender.send(&frame).await.expect("send failed");

    let received = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(received, frame);
}

#[tokio::test]
async fn test_frame_ids_advance() {
    let receiver = FrameReceiver::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = receiver.local_addr().unwrap();

    let mut sender = FrameSender::connect(addr).await.expect("connect failed");
    assert_eq!(sender.next_frame_id(), 0);
    sender.send(b"a").await.unwrap();
    sender.send(b"b").await.unwrap();
    assert_eq!(sender.next_frame_id(), 2);
}
