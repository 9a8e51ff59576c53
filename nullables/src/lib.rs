//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the workflow (storage, email dispatch,
//! assets) are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (forced failures, recorded sends)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod assets;
pub mod mailer;
pub mod store;

pub use assets::NullAssetStore;
pub use mailer::{NullMailer, SentMail};
pub use store::NullContactStore;
