//! Shared utilities for the poll client.

pub mod logging;

pub use logging::{init_logging, LogFormat};
