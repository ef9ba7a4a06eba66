//! Command-line interface definitions and helpers.
//!
//! Argument parsing lives in `args`; `resolve` merges the parsed arguments
//! with the config file into a [`SnapshotRequest`](crate::snapshot::SnapshotRequest).

mod args;
mod resolve;

pub use args::Args;
pub use resolve::{load_config, resolve_request, DEFAULT_OUTPUT};
