use thiserror::Error;

use crate::validate::FieldErrors;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// Bad input shape. The only error that carries detail back to the
    /// caller, and only about the fields themselves.
    #[error("invalid input")]
    Validation(FieldErrors),

    /// Storage or dispatch failed. Deliberately detail-free toward the
    /// caller; the specifics are in the server-side logs.
    #[error("something went wrong, please try again")]
    Transient,
}
