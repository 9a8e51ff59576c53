//! Verification token generation and format validation.
//!
//! Tokens are opaque, single-use, time-limited credentials proving control
//! of an email address. The wire format is a fixed external contract:
//! exactly 43 characters of `[A-Za-z0-9_-]` (base64url, no padding, of
//! 32 random bytes). Verification URLs already issued embed this format,
//! so it must never change.

pub mod token;

pub use token::{VerificationToken, TOKEN_LEN};
