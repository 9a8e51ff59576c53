//! The verification token type.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes of entropy per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Length of the encoded token: 32 bytes base64url without padding.
pub const TOKEN_LEN: usize = 43;

/// A single-use email verification token.
///
/// Always holds a well-formed 43-character base64url string; arbitrary
/// strings enter only through [`VerificationToken::from_str_checked`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Generate a fresh token from 256 bits of OS randomness.
    ///
    /// The only failure mode is the OS randomness source being unavailable,
    /// which is unrecoverable and panics inside `OsRng`.
    pub fn generate() -> Self {
        let mut buf = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut buf);
        Self(URL_SAFE_NO_PAD.encode(buf))
    }

    /// Purely syntactic format check: exactly [`TOKEN_LEN`] characters,
    /// all from `[A-Za-z0-9_-]`. No storage or clock access; used to
    /// short-circuit obviously malformed input before a store lookup.
    pub fn is_valid_format(s: &str) -> bool {
        s.len() == TOKEN_LEN
            && s.bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }

    /// Accept an externally supplied token string, rejecting anything that
    /// fails the format check.
    pub fn from_str_checked(s: &str) -> Option<Self> {
        if Self::is_valid_format(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
