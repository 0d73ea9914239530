//! Logging setup for the CLI.
//!
//! Format is controlled via `HLF_LOG_FORMAT`:
//! - `json` - Structured JSON output
//! - `pretty` - Human-readable multi-line output
//! - `compact` - Single-line output (default)
//!
//! The filter comes from `HLF_LOG_LEVEL`, then `RUST_LOG`, then the `-v` count.
//! Logs go to stderr so command output on stdout stays pipeable.

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig, TracingConfigBuilder};
pub use tracing_setup::{TracingGuard, init_tracing};
