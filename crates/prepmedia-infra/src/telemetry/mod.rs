//! Tracing initialization
//!
//! `RUST_LOG` overrides the default filter. Output is human readable unless the
//! configuration asks for JSON lines.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, DEFAULT_LOG_FILTER};
