//! Capture one frame from a camera and save it to disk.
//!
//! The whole routine is a straight line: pick the encoder from the output
//! path, open the device, read one frame, release the device, encode, write.
//! Every step that can fail returns an error naming that step, and the
//! destination file is only touched once a valid frame has been encoded.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::camera::{mirror_horizontal, CameraError, CameraHandle, CameraSettings, FrameSource};
use crate::encode::{encode_frame, EncodeError, OutputFormat};

/// What to capture and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub output: PathBuf,
    pub camera: CameraSettings,
}

/// Description of a snapshot that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Errors that can occur while taking a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unsupported output file '{}': extension must be one of {}", path.display(), OutputFormat::supported_extensions().join(", "))]
    UnsupportedFormat { path: PathBuf },

    #[error("camera {index}: {source}")]
    Camera {
        index: u32,
        #[source]
        source: CameraError,
    },

    #[error("camera {index} returned an unusable frame: {source}")]
    InvalidFrame {
        index: u32,
        #[source]
        source: EncodeError,
    },

    #[error("failed to encode frame: {0}")]
    Encode(#[source] EncodeError),

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Take a snapshot with the system camera backend.
pub fn run(request: &SnapshotRequest) -> Result<Snapshot, SnapshotError> {
    capture_with(request, CameraHandle::open)
}

/// Take a snapshot using `open` to acquire the frame source.
///
/// The source is opened only after the output format has been resolved and
/// is dropped right after the single read, before any encoding work.
pub fn capture_with<S, F>(request: &SnapshotRequest, open: F) -> Result<Snapshot, SnapshotError>
where
    S: FrameSource,
    F: FnOnce(&CameraSettings) -> Result<S, CameraError>,
{
    let index = request.camera.device_index;
    let format = OutputFormat::from_path(&request.output).ok_or_else(|| {
        SnapshotError::UnsupportedFormat {
            path: request.output.clone(),
        }
    })?;

    log::debug!("Opening camera {}", index);
    let mut camera =
        open(&request.camera).map_err(|source| SnapshotError::Camera { index, source })?;

    let read = camera.read_frame();
    drop(camera);

    let mut frame = read.map_err(|source| SnapshotError::Camera { index, source })?;
    log::debug!(
        "Read {} frame ({} bytes) from camera {}",
        frame.resolution(),
        frame.data.len(),
        index
    );

    if request.camera.mirror {
        mirror_horizontal(&mut frame);
    }

    let bytes = encode_frame(&frame, format).map_err(|e| match e {
        EncodeError::InvalidFrame { .. } => SnapshotError::InvalidFrame { index, source: e },
        other => SnapshotError::Encode(other),
    })?;

    log::debug!(
        "Encoded {} {:?} after capture",
        format,
        frame.timestamp.elapsed()
    );

    write_output(&request.output, &bytes)?;
    log::info!(
        "Wrote {} byte {} to {}",
        bytes.len(),
        format,
        request.output.display()
    );

    Ok(Snapshot {
        path: request.output.clone(),
        format,
        width: frame.width,
        height: frame.height,
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    replace_file(path, |file| file.write_all(bytes)).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with whatever `fill` writes, all or nothing.
///
/// The content goes to a temp file in the destination's directory which is
/// renamed over `path` only after `fill` succeeds. On any error the previous
/// file (if there was one) is left as it was and the temp file is removed.
fn replace_file<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    fill(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;
    temp.as_file().sync_all()?;

    // Temp files are created private; give the snapshot normal file permissions
    match fs::metadata(path) {
        Ok(existing) => temp.as_file().set_permissions(existing.permissions())?,
        Err(_) => set_default_permissions(temp.as_file())?,
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}
