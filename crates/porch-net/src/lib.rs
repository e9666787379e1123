//! Datagram frame transport for the porch ecosystem.
//!
//! Frames (typically JPEG images) are split into datagrams that each carry a
//! fixed header with a frame id, chunk index, chunk count, and payload
//! length. The receiver reassembles frames from chunks arriving in any
//! order, tolerates loss by discarding incomplete frames, and never blocks
//! on a missing datagram.

pub mod assembler;
pub mod config;
pub mod error;
pub mod protocol;
pub mod receiver;
pub mod sender;

pub use assembler::FrameAssembler;
pub use config::TransportConfig;
pub use error::NetError;
pub use protocol::{chunk_frame, ChunkHeader, HEADER_LEN, MAGIC};
pub use receiver::FrameReceiver;
pub use sender::FrameSender;
