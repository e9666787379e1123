//! Wire format for frame datagrams.
//!
//! Every datagram starts with a 16-byte little-endian header:
//!
//! ```text
//! magic        u32   constant, rejects stray traffic
//! frame_id     u32   increments once per frame sent
//! chunk_index  u16   0-based position of this chunk
//! chunk_count  u16   total chunks in the frame, >= 1
//! payload_len  u16   payload bytes following the header
//! reserved     u16   zero on send, ignored on receive
//! ```

use crate::NetError;

/// "FROP" on the wire when written little-endian.
pub const MAGIC: u32 = 0x504F5246;

pub const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub frame_id: u32,
    pub chunk_index: u16,
    pub chunk_count: u16,
    pub payload_len: u16,
}

impl ChunkHeader {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC.to_le_bytes());
        buf.extend_from_slice(&self.frame_id.to_le_bytes());
        buf.extend_from_slice(&self.chunk_index.to_le_bytes());
        buf.extend_from_slice(&self.chunk_count.to_le_bytes());
        buf.extend_from_slice(&self.payload_len.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    /// Parse and validate a datagram, returning the header and its payload.
    ///
    /// # Errors
    ///
    /// - `Truncated` if the datagram is shorter than a header
    /// - `BadMagic` on a foreign or corrupted datagram
    /// - `InvalidChunk` if `chunk_count` is zero or `chunk_index` out of range
    /// - `LengthMismatch` if `payload_len` disagrees with the datagram size
    pub fn decode(datagram: &[u8]) -> Result<(ChunkHeader, &[u8]), NetError> {
        if datagram.len() < HEADER_LEN {
            return Err(NetError::Truncated(datagram.len()));
        }

        let magic = u32::from_le_bytes(datagram[0..4].try_into().unwrap());
        if magic != MAGIC {
            return Err(NetError::BadMagic(magic));
        }

        let header = ChunkHeader {
            frame_id: u32::from_le_bytes(datagram[4..8].try_into().unwrap()),
            chunk_index: u16::from_le_bytes(datagram[8..10].try_into().unwrap()),
            chunk_count: u16::from_le_bytes(datagram[10..12].try_into().unwrap()),
            payload_len: u16::from_le_bytes(datagram[12..14].try_into().unwrap()),
        };

        if header.chunk_count == 0 || header.chunk_index >= header.chunk_count {
            return Err(NetError::InvalidChunk {
                index: header.chunk_index,
                count: header.chunk_count,
            });
        }

        let payload = &datagram[HEADER_LEN..];
        if payload.len() != header.payload_len as usize {
            return Err(NetError::LengthMismatch {
                header: header.payload_len,
                actual: payload.len(),
            });
        }

        Ok((header, payload))
    }
}

/// Split a frame into ready-to-send datagrams of at most
/// `HEADER_LEN + max_payload` bytes each.
///
/// An empty frame still produces one (payload-less) datagram so the receiver
/// observes every frame id.
///
/// # Errors
///
/// Returns `FrameTooLarge` if the frame needs more than `u16::MAX` chunks at
/// the given payload size.
pub fn chunk_frame(
    frame_id: u32,
    frame: &[u8],
    max_payload: usize,
) -> Result<Vec<Vec<u8>>, NetError> {
    let max_payload = max_payload.min(u16::MAX as usize).max(1);

    let chunk_count = frame.len().div_ceil(max_payload).max(1);
    if chunk_count > u16::MAX as usize {
        return Err(NetError::FrameTooLarge(frame.len()));
    }

    let mut datagrams = Vec::with_capacity(chunk_count);
    for index in 0..chunk_count {
        let start = index * max_payload;
        let end = (start + max_payload).min(frame.len());
        let payload = &frame[start..end];

        let header = ChunkHeader {
            frame_id,
            chunk_index: index as u16,
            chunk_count: chunk_count as u16,
            payload_len: payload.len() as u16,
        };

        let mut datagram = Vec::with_capacity(HEADER_LEN + payload.len());
        header.encode(&mut datagram);
        datagram.extend_from_slice(payload);
        datagrams.push(datagram);
    }

    Ok(datagrams)
}
