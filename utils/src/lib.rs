//! Shared utilities for the continua service.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
