//! Camera capture abstraction for the porch ecosystem.
//!
//! This crate provides a unified `Camera` trait for async frame capture,
//! with a V4L2 backend and a deterministic test-pattern source.

pub mod config;
pub mod error;
pub mod testpattern;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use testpattern::TestPatternCamera;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
