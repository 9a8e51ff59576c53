//! HTTP API for the lead-capture service.
//!
//! Provides endpoints for:
//! - Verification requests (book funnel entry point)
//! - Token confirmation
//! - Plain signup
//! - Verified-only book downloads

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::ServiceConfig;
pub use error::RpcError;
pub use server::RpcServer;
