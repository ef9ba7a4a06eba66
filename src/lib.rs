//! webcam-snap library crate.
//!
//! Captures a single frame from a webcam and writes it to an image file
//! whose format is chosen by the file extension. The binary is a thin
//! wrapper over [`snapshot::run`].

pub mod camera;
pub mod cli;
pub mod config;
pub mod encode;
pub mod snapshot;
