//! Fundamental types for the Continua verification service.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: normalized email addresses, contact identifiers, book
//! categories, and timestamps.

pub mod category;
pub mod contact;
pub mod email;
pub mod time;

pub use category::{BookCategory, ParseCategoryError};
pub use contact::ContactId;
pub use email::{EmailAddress, ParseEmailError};
pub use time::Timestamp;
