use porch_net::{chunk_frame, ChunkHeader, NetError, HEADER_LEN, MAGIC};

#[test]
fn test_header_roundtrip() {
    let header = ChunkHeader {
        frame_id: 42,
        chunk_index: 3,
        chunk_count: 7,
        payload_len: 5,
    };

    let mut datagram = Vec::new();
    header.encode(&mut datagram);
    datagram.extend_from_slice(b"hello");

    let (decoded, payload) = ChunkHeader::decode(&datagram).unwrap();
    assert_eq!(decoded, header);
    assert_eq!(payload, b"hello");
}

#[test]
fn test_magic_on_wire() {
    let header = ChunkHeader {
        frame_id: 0,
        chunk_index: 0,
        chunk_count: 1,
        payload_len: 0,
    };
    let mut datagram = Vec::new();
    header.encode(&mut datagram);

    assert_eq!(datagram.len(), HEADER_LEN);
    assert_eq!(&datagram[..4], &MAGIC.to_le_bytes());
}

#[test]
fn test_decode_rejects_truncated() {
    let result = ChunkHeader::decode(&[0u8; 4]);
    assert!(matches!(result, Err(NetError::Truncated(4))));
}

#[test]
fn test_decode_rejects_bad_magic() {
    let mut datagram = vec![0u8; HEADER_LEN];
    datagram[0..4].copy_from_slice(&0xDEADBEEFu32.to_le_bytes());
    datagram[10] = 1; // chunk_count = 1 so only magic is wrong

    let result = ChunkHeader::decode(&datagram);
    assert!(matches!(result, Err(NetError::BadMagic(0xDEADBEEF))));
}

#[test]
fn test_decode_rejects_zero_chunk_count() {
    let header = ChunkHeader {
        frame_id: 1,
        chunk_index: 0,
        chunk_count: 1,
        payload_len: 0,
    };
    let mut datagram = Vec::new();
    header.encode(&mut datagram);
    // Corrupt chunk_count to zero
    datagram[10..12].copy_from_slice(&0u16.to_le_bytes());

    let result = ChunkHeader::decode(&datagram);
    assert!(matches!(
        result,
        Err(NetError::InvalidChunk { index: 0, count: 0 })
    ));
}

#[test]
fn test_decode_rejects_index_out_of_range() {
    let header = ChunkHeader {
        frame_id: 1,
        chunk_index: 5,
        chunk_count: 5,
        payload_len: 0,
    };
    let mut datagram = Vec::new();
    header.encode(&mut datagram);

    let result = ChunkHeader::decode(&datagram);
    assert!(matches!(
        result,
        Err(NetError::InvalidChunk { index: 5, count: 5 })
    ));
}

#[test]
fn test_decode_rejects_length_mismatch() {
    let header = ChunkHeader {
        frame_id: 1,
        chunk_index: 0,
        chunk_count: 1,
        payload_len: 10,
    };
    let mut datagram = Vec::new();
    header.encode(&mut datagram);
    datagram.extend_from_slice(b"abc"); // only 3 bytes

    let result = ChunkHeader::decode(&datagram);
    assert!(matches!(
        result,
        Err(NetError::LengthMismatch {
            header: 10,
            actual: 3
        })
    ));
}

#[test]
fn test_chunk_frame_splits_and_covers_all_bytes() {
    let frame: Vec<u8> = (0..=255).cycle().take(1000).map(|v| v as u8).collect();
    let datagrams = chunk_frame(9, &frame, 300).unwrap();

    assert_eq!(datagrams.len(), 4); // ceil(1000 / 300)

    let mut reassembled = Vec::new();
    for (i, datagram) in datagrams.iter().enumerate() {
        let (header, payload) = ChunkHeader::decode(datagram).unwrap();
        assert_eq!(header.frame_id, 9);
        assert_eq!(header.chunk_index, i as u16);
        assert_eq!(header.chunk_count, 4);
        reassembled.extend_from_slice(payload);
    }
    assert_eq!(reassembled, frame);
}

#[test]
fn test_chunk_frame_single_chunk() {
    let datagrams = chunk_frame(1, b"tiny", 1000).unwrap();
    assert_eq!(datagrams.len(), 1);
    let (header, payload) = ChunkHeader::decode(&datagrams[0]).unwrap();
    assert_eq!(header.chunk_count, 1);
    assert_eq!(payload, b"tiny");
}

#[test]
fn test_chunk_frame_empty_frame_still_sends() {
    let datagrams = chunk_frame(1, b"", 1000).unwrap();
    assert_eq!(datagrams.len(), 1);
    let (header, payload) = ChunkHeader::decode(&datagrams[0]).unwrap();
    assert_eq!(header.chunk_count, 1);
    assert!(payload.is_empty());
}

#[test]
fn test_chunk_frame_rejects_oversized() {
    // 2 bytes per chunk means a frame over 128 KiB needs > u16::MAX chunks
    let frame = vec![0u8; 2 * (u16::MAX as usize + 1)];
    let result = chunk_frame(1, &frame, 2);
    assert!(matches!(result, Err(NetError::FrameTooLarge(_))));
}
