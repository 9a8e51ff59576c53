//! Normalized email address type.
//!
//! The normalized form (lowercased, whitespace-trimmed) is the uniqueness
//! key for contacts, so every address entering the system goes through
//! [`EmailAddress::parse`] exactly once and stays normalized from there on.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum total length accepted for an address (RFC 5321 limit).
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEmailError {
    #[error("email is required")]
    Empty,

    #[error("email is too long")]
    TooLong,

    #[error("email is not a valid address")]
    Malformed,
}

/// A syntactically valid email address in normalized form.
///
/// Construction via [`EmailAddress::parse`] is the only way to obtain one,
/// so holding an `EmailAddress` implies the normalization invariant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize a raw address: trim, lowercase, then validate
    /// shape (single `@`, non-empty local part, dotted domain, no
    /// whitespace or control characters).
    pub fn parse(raw: &str) -> Result<Self, ParseEmailError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ParseEmailError::Empty);
        }
        if normalized.len() > MAX_EMAIL_LEN {
            return Err(ParseEmailError::TooLong);
        }
        if normalized
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ParseEmailError::Malformed);
        }

        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().ok_or(ParseEmailError::Malformed)?;

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ParseEmailError::Malformed);
        }
        // Domain needs at least one interior dot.
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ParseEmailError::Malformed);
        }

        Ok(Self(normalized))
    }

    /// Return the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
