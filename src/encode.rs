//! Output format selection and frame encoding.
//!
//! The encoder is chosen from the destination path's extension; there are
//! no format or quality options beyond that.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::camera::{Frame, FrameFormat};

/// Image encodings a snapshot can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    /// Lossless WebP
    WebP,
    /// Binary PPM
    Pnm,
    Tga,
}

impl OutputFormat {
    /// Pick the encoder for a path from its extension (case-insensitive).
    ///
    /// Returns `None` when the path has no extension or the extension is not
    /// a supported image type.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_extension(&ext)
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            "ppm" | "pnm" => Some(Self::Pnm),
            "tga" => Some(Self::Tga),
            _ => None,
        }
    }

    /// Extensions accepted for output paths, for error messages.
    pub fn supported_extensions() -> &'static [&'static str] {
        &[
            "png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp", "ppm", "pnm", "tga",
        ]
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
            Self::WebP => ImageFormat::WebP,
            Self::Pnm => ImageFormat::Pnm,
            Self::Tga => ImageFormat::Tga,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
            Self::WebP => "WebP",
            Self::Pnm => "PPM",
            Self::Tga => "TGA",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("frame is {width}x{height} with {len} bytes of pixel data, expected {expected}")]
    InvalidFrame {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },

    #[error("{format} encoder failed: {source}")]
    Image {
        format: OutputFormat,
        #[source]
        source: image::ImageError,
    },
}

/// Encode a frame into an in-memory image file.
///
/// Nothing touches the filesystem here, so a failed encode never leaves a
/// partial file behind.
pub fn encode_frame(frame: &Frame, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    let invalid = || EncodeError::InvalidFrame {
        width: frame.width,
        height: frame.height,
        len: frame.data.len(),
        expected: frame.expected_len(),
    };

    if !frame.is_valid() {
        return Err(invalid());
    }

    let image = match frame.format {
        FrameFormat::Rgb => RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(invalid)?,
    };

    let mut out = Cursor::new(Vec::with_capacity(frame.data.len() / 4));
    image
        .write_to(&mut out, format.image_format())
        .map_err(|source| EncodeError::Image { format, source })?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128]);
            }
        }
        Frame::rgb(width, height, data)
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("image.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("image.jpg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("a/b/c.jpeg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("x.tif")), Some(OutputFormat::Tiff));
        assert_eq!(OutputFormat::from_path(Path::new("x.webp")), Some(OutputFormat::WebP));
    }

    #[test]
    fn test_format_extension_is_case_insensitive() {
        assert_eq!(OutputFormat::from_path(Path::new("SHOT.JPG")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("shot.Png")), Some(OutputFormat::Png));
    }

    #[test]
    fn test_format_rejects_unknown_or_missing_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("image")), None);
        assert_eq!(OutputFormat::from_path(Path::new("image.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new(".jpg")), None);
    }

    #[test]
    fn test_every_listed_extension_resolves() {
        for ext in OutputFormat::supported_extensions() {
            assert!(
                OutputFormat::from_extension(ext).is_some(),
                "{ext} is advertised but not mapped"
            );
        }
    }

    #[test]
    fn test_encode_png_decodes_with_same_dimensions() {
        let frame = gradient(16, 9);
        let bytes = encode_frame(&frame, OutputFormat::Png).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 9));
        // PNG is lossless
        assert_eq!(decoded.into_raw(), frame.data);
    }

    #[test]
    fn test_encode_jpeg() {
        let bytes = encode_frame(&gradient(32, 24), OutputFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }

    #[test]
    fn test_encode_all_formats_succeed() {
        let frame = gradient(8, 8);
        for format in [
            OutputFormat::Png,
            OutputFormat::Jpeg,
            OutputFormat::Bmp,
            OutputFormat::Tiff,
            OutputFormat::WebP,
            OutputFormat::Pnm,
            OutputFormat::Tga,
        ] {
            let bytes = encode_frame(&frame, format)
                .unwrap_or_else(|e| panic!("{format} encode failed: {e}"));
            assert!(!bytes.is_empty(), "{format} produced no bytes");
        }
    }

    #[test]
    fn test_encode_rejects_empty_frame() {
        let frame = Frame::rgb(0, 0, Vec::new());
        match encode_frame(&frame, OutputFormat::Jpeg) {
            Err(EncodeError::InvalidFrame { width, height, .. }) => {
                assert_eq!((width, height), (0, 0));
            }
            other => panic!("Expected InvalidFrame, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_rejects_truncated_buffer() {
        let frame = Frame::rgb(4, 4, vec![0; 10]);
        let err = encode_frame(&frame, OutputFormat::Png).unwrap_err();
        assert_eq!(
            err.to_string(),
            "frame is 4x4 with 10 bytes of pixel data, expected 48"
        );
    }
}
