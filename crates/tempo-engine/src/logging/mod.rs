//! Logging utilities.
//!
//! The engine only talks to the `log` facade; binaries call `init_logging`
//! early in `main` to install an `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
