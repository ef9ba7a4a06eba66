//! Camera access for single-frame capture.
//!
//! - Opening a device via [`CameraHandle`]
//! - Reading frames through the [`FrameSource`] trait
//! - Configuration via [`CameraSettings`] and [`Resolution`]

mod frame_utils;
mod handle;
mod types;

pub use frame_utils::mirror_horizontal;
pub use handle::{CameraHandle, FrameSource};
pub use types::{CameraError, CameraSettings, Frame, FrameFormat, Resolution};
