//! Prepmedia Infrastructure Library
//!
//! Process-level plumbing shared by the binaries. Today that is telemetry initialization.

pub mod telemetry;

pub use telemetry::{init_telemetry, shutdown_telemetry, DEFAULT_LOG_FILTER};
