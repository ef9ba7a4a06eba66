//! Camera device handle.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::frame_utils::convert_to_rgb;
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Anything that can hand out a single frame on request.
pub trait FrameSource {
    /// Block until the next frame is available and return it.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;
}

/// An open camera with a running stream.
///
/// The stream is stopped when the handle is dropped, so the device is
/// released on every exit path.
pub struct CameraHandle {
    camera: Camera,
    index: u32,
}

impl std::fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraHandle")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl CameraHandle {
    /// Open the camera at `settings.device_index` and start its stream.
    ///
    /// The index is not validated up front; a missing device surfaces as
    /// `CameraError::OpenFailed`.
    ///
    /// # Errors
    /// * `CameraError::PermissionDenied` - If camera access is denied (macOS)
    /// * `CameraError::OpenFailed` - If the camera fails to open for other reasons
    /// * `CameraError::StreamFailed` - If the camera stream fails to start
    pub fn open(settings: &CameraSettings) -> Result<Self, CameraError> {
        let index = CameraIndex::Index(settings.device_index);
        let mut camera = open_camera_with_fallback(&index, settings)?;

        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let res = camera.resolution();
        log::info!(
            "Opened camera {} at {} @ {} fps",
            settings.device_index,
            Resolution {
                width: res.width(),
                height: res.height(),
            },
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            index: settings.device_index,
        })
    }
}

impl FrameSource for CameraHandle {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let raw = self
            .camera
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;
        convert_to_rgb(&raw)
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        match self.camera.stop_stream() {
            Ok(()) => log::debug!("Released camera {}", self.index),
            Err(e) => log::warn!("Failed to stop stream on camera {}: {}", self.index, e),
        }
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);

    // 1. Closest match with MJPEG (widely supported, cheap to transfer)
    // 2. Closest match with YUYV (uncompressed UVC default)
    // 3. Highest resolution available (let camera decide format)
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            NokhwaFrameFormat::YUYV,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!(
                    "Camera {} rejected format request: {}",
                    settings.device_index,
                    e
                );
                last_error = Some(e.to_string());
            }
        }
    }

    let msg = last_error.unwrap_or_else(|| "no format could be negotiated".to_string());
    Err(classify_open_error(msg))
}

/// Map a backend open error message to a [`CameraError`].
fn classify_open_error(msg: String) -> CameraError {
    let lower = msg.to_lowercase();
    if lower.contains("permission")
        || lower.contains("denied")
        || lower.contains("authorization")
        || lower.contains("access")
    {
        CameraError::PermissionDenied
    } else {
        CameraError::OpenFailed(msg)
    }
}
