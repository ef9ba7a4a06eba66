//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

/// Capture a single frame from a webcam and save it as an image
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "webcam-snap")]
#[command(version, about = "Captures an image from a webcam and saves it", long_about = None)]
pub struct Args {
    /// Name of the file to save the image as; the extension picks the format
    /// (default: image.jpg)
    pub output: Option<PathBuf>,

    /// Camera device index (default: 0)
    #[arg(value_name = "CAMERA_NUM")]
    pub camera_num: Option<u32>,

    /// Mirror the image horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Don't print progress to stdout
    #[arg(long, short)]
    pub quiet: bool,
}
