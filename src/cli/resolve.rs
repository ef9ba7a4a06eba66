//! Merge parsed arguments with the config file.
//!
//! Precedence: CLI args > config file > built-in defaults.

use std::path::PathBuf;

use super::args::Args;
use crate::config::{Config, ConfigError};
use crate::snapshot::SnapshotRequest;

/// Output path used when neither the CLI nor the config names one.
pub const DEFAULT_OUTPUT: &str = "image.jpg";

/// Load the config file for these arguments.
///
/// An explicit `--config` must exist and parse. The default config file is
/// optional, and a broken one only produces a warning.
pub fn load_config(args: &Args) -> Result<Config, ConfigError> {
    match &args.config {
        Some(path) => Config::load_from_explicit(path.clone()),
        None => Ok(Config::load().unwrap_or_else(|e| {
            log::warn!("{}; using default settings", e);
            Config::default()
        })),
    }
}

/// Build the snapshot request from arguments and config.
pub fn resolve_request(args: &Args, config: &Config) -> SnapshotRequest {
    let mut camera = config.camera_settings();
    if let Some(index) = args.camera_num {
        camera.device_index = index;
    }
    camera.mirror |= args.mirror;

    let output = args
        .output
        .clone()
        .or_else(|| config.output.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    SnapshotRequest { output, camera }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraSettings;
    use clap::Parser;

    #[test]
    fn test_defaults_without_args_or_config() {
        let args = Args::parse_from(["webcam-snap"]);
        let request = resolve_request(&args, &Config::default());
        assert_eq!(request.output, PathBuf::from("image.jpg"));
        assert_eq!(request.camera, CameraSettings::default());
    }

    #[test]
    fn test_config_fills_missing_args() {
        let config = Config::parse(
            "[camera]\ndevice = 4\nmirror = true\n[output]\npath = \"cfg.png\"\n",
        )
        .unwrap();
        let args = Args::parse_from(["webcam-snap"]);
        let request = resolve_request(&args, &config);
        assert_eq!(request.output, PathBuf::from("cfg.png"));
        assert_eq!(request.camera.device_index, 4);
        assert!(request.camera.mirror);
    }

    #[test]
    fn test_args_override_config() {
        let config = Config::parse("[camera]\ndevice = 4\n[output]\npath = \"cfg.png\"\n").unwrap();
        let args = Args::parse_from(["webcam-snap", "cli.jpg", "0", "--mirror"]);
        let request = resolve_request(&args, &config);
        assert_eq!(request.output, PathBuf::from("cli.jpg"));
        // An explicit 0 still beats the config's device
        assert_eq!(request.camera.device_index, 0);
        assert!(request.camera.mirror);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let args = Args::parse_from(["webcam-snap", "-c", missing.to_str().unwrap()]);
        assert!(matches!(load_config(&args), Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.toml");
        std::fs::write(&path, "[camera]\nfps = 10\n").unwrap();

        let args = Args::parse_from(["webcam-snap", "-c", path.to_str().unwrap()]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.camera_settings().fps, 10);
    }
}
