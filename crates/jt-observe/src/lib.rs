//! Diagnostic logging setup for the launcher.
//!
//! Console output (progress dots, log lines) is written by the binary itself;
//! this crate only wires the `tracing` subscriber, which writes to stderr.
mod logger;
pub use logger::*;
