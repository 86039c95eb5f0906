//! # Observability
//!
//! Library code only emits `tracing` events. [`init_logging`] wires them to
//! stdout for binaries, benches and examples that want to see them.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
