//! MJPEG-over-HTTP serving for the porch ecosystem.
//!
//! JPEG frames published into a [`FrameHub`] fan out to any number of HTTP
//! clients as a `multipart/x-mixed-replace` stream, the format browsers
//! render as live video in an `<img>` tag.

pub mod hub;
pub mod mjpeg;
pub mod server;

pub use hub::{FrameHub, PartStream};
pub use server::{router, serve};
