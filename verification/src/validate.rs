//! Field-level input validation.
//!
//! Runs before anything touches storage: a request that fails here leaves
//! no trace. Error messages are written for end users, keyed by field so
//! the frontend can attach them inline.

use continua_types::{EmailAddress, ParseEmailError};
use serde::Serialize;

/// Upper bound on the display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Per-field validation messages. Empty vectors mean the field passed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// Validate a name/email pair, returning the trimmed name and the
/// normalized address, or every problem found across both fields.
pub fn validate_identity(name: &str, email: &str) -> Result<(String, EmailAddress), FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = name.trim();
    if name.is_empty() {
        errors.name.push("Name is required".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        errors
            .name
            .push(format!("Name must be {MAX_NAME_LEN} characters or fewer"));
    }

    let email = match EmailAddress::parse(email) {
        Ok(email) => Some(email),
        Err(ParseEmailError::Empty) => {
            errors.email.push("Email is required".to_string());
            None
        }
        Err(_) => {
            errors.email.push("Enter a valid email address".to_string());
            None
        }
    };

    match email {
        Some(email) if errors.is_empty() => Ok((name.to_string(), email)),
        _ => Err(errors),
    }
}
