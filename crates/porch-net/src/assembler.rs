use crate::{ChunkHeader, NetError};
use std::collections::HashMap;

/// `true` when `a` is newer than `b` under wrapping u32 arithmetic.
fn newer(a: u32, b: u32) -> bool {
    a.wrapping_sub(b) as i32 > 0
}

struct PartialFrame {
    chunk_count: u16,
    received: u16,
    chunks: Vec<Option<Vec<u8>>>,
}

impl PartialFrame {
    fn new(chunk_count: u16) -> Self {
        Self {
            chunk_count,
            received: 0,
            chunks: vec![None; chunk_count as usize],
        }
    }
}

/// Reassembles frames from datagrams arriving in any order.
///
/// Keeps at most `window` frames in flight. Completing a frame discards
/// everything older, so a lost datagram costs only its own frame and the
/// assembler never waits on a chunk that will not come. Chunks for frames
/// at or before the newest completed one are ignored.
pub struct FrameAssembler {
    window: usize,
    partial: HashMap<u32, PartialFrame>,
    last_completed: Option<u32>,
    frames_completed: u64,
    frames_dropped: u64,
}

impl FrameAssembler {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            partial: HashMap::new(),
            last_completed: None,
            frames_completed: 0,
            frames_dropped: 0,
        }
    }

    /// Feed one datagram; returns a complete frame when this chunk was the
    /// last missing piece.
    ///
    /// Duplicate chunks are idempotent. Stale chunks (for frames at or
    /// before the newest completed frame) are silently ignored.
    ///
    /// # Errors
    ///
    /// Header validation errors from [`ChunkHeader::decode`], and
    /// `ChunkCountMismatch` if a frame's datagrams disagree on the chunk
    /// count. Neither poisons the assembler; the caller can keep feeding
    /// datagrams.
    pub fn push(&mut self, datagram: &[u8]) -> Result<Option<Vec<u8>>, NetError> {
        let (header, payload) = ChunkHeader::decode(datagram)?;

        if let Some(last) = self.last_completed {
            if !newer(header.frame_id, last) {
                return Ok(None);
            }
        }

        let entry = self
            .partial
            .entry(header.frame_id)
            .or_insert_with(|| PartialFrame::new(header.chunk_count));

        if entry.chunk_count != header.chunk_count {
            let expected = entry.chunk_count;
            self.partial.remove(&header.frame_id);
            self.frames_dropped += 1;
            return Err(NetError::ChunkCountMismatch {
                frame_id: header.frame_id,
                expected,
                got: header.chunk_count,
            });
        }

        let slot = &mut entry.chunks[header.chunk_index as usize];
        if slot.is_none() {
            *slot = Some(payload.to_vec());
            entry.received += 1;
        }

        if entry.received == entry.chunk_count {
            return Ok(Some(self.complete(header.frame_id)));
        }

        self.evict_overflow();
        Ok(None)
    }

    /// Number of frames fully reassembled.
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Number of partial frames discarded (superseded or evicted).
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Partial frames currently buffered.
    pub fn in_flight(&self) -> usize {
        self.partial.len()
    }

    fn complete(&mut self, frame_id: u32) -> Vec<u8> {
        let entry = self.partial.remove(&frame_id).expect("frame present");

        let mut frame = Vec::new();
        for chunk in entry.chunks {
            frame.extend_from_slice(&chunk.expect("all chunks received"));
        }

        // Anything older than the completed frame can no longer finish first
        let stale: Vec<u32> = self
            .partial
            .keys()
            .copied()
            .filter(|&id| !newer(id, frame_id))
            .collect();
        for id in stale {
            self.partial.remove(&id);
            self.frames_dropped += 1;
        }

        self.last_completed = Some(frame_id);
        self.frames_completed += 1;
        frame
    }

    fn evict_overflow(&mut self) {
        while self.partial.len() > self.window {
            // Evict the oldest in-flight frame
            let oldest = self
                .partial
                .keys()
                .copied()
                .reduce(|a, b| if newer(a, b) { b } else { a });
            match oldest {
                Some(id) => {
                    self.partial.remove(&id);
                    self.frames_dropped += 1;
                }
                None => break,
            }
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(crate::TransportConfig::default().window())
    }
}
