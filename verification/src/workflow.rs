//! The verification workflow itself.

use std::sync::Arc;

use continua_delivery::EmailDispatch;
use continua_store::{ContactStore, ContactVerifier, VerifyOutcome};
use continua_tokens::VerificationToken;
use continua_types::{BookCategory, Timestamp};
use tracing::{error, info};

use crate::error::VerificationError;
use crate::outcomes::ConfirmOutcome;
use crate::validate::validate_identity;

/// Verification tokens live for 24 hours.
pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Orchestrates verification requests, confirmations, and plain signups
/// over injected storage and delivery.
pub struct VerificationWorkflow {
    contacts: Arc<dyn ContactStore>,
    verifier: Arc<dyn ContactVerifier>,
    mailer: Arc<dyn EmailDispatch>,
}

impl VerificationWorkflow {
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        verifier: Arc<dyn ContactVerifier>,
        mailer: Arc<dyn EmailDispatch>,
    ) -> Self {
        Self {
            contacts,
            verifier,
            mailer,
        }
    }

    /// Handle a verification request: validate, issue a fresh token with a
    /// 24-hour expiry, upsert the contact, and dispatch the email.
    ///
    /// Success deliberately carries nothing back — in particular not
    /// whether the email was already known or verified. Storage and
    /// dispatch failures both collapse to [`VerificationError::Transient`];
    /// a dispatch failure leaves the stored token in place, so the user
    /// retrying simply reissues.
    pub fn request_verification(
        &self,
        name: &str,
        email: &str,
        category: BookCategory,
    ) -> Result<(), VerificationError> {
        let (name, email) = validate_identity(name, email).map_err(VerificationError::Validation)?;

        let token = VerificationToken::generate();
        let expires_at = Timestamp::now().plus_secs(TOKEN_TTL_SECS);

        let contact = self
            .contacts
            .upsert_for_verification(&email, &name, &token, expires_at, category)
            .map_err(|err| {
                error!(%err, "verification upsert failed");
                VerificationError::Transient
            })?;

        self.mailer
            .send_verification(&email, &name, &token)
            .map_err(|err| {
                error!(%err, %contact, "verification email dispatch failed");
                VerificationError::Transient
            })?;

        info!(%contact, category = category.as_str(), "verification email dispatched");
        Ok(())
    }

    /// Handle a submitted token.
    ///
    /// A string that is not even token-shaped is rejected up front without
    /// touching storage. Otherwise the consume is a single atomic storage
    /// operation: of two concurrent submissions of the same live token,
    /// exactly one sees `Verified`.
    pub fn confirm_verification(
        &self,
        raw_token: &str,
    ) -> Result<ConfirmOutcome, VerificationError> {
        let Some(token) = VerificationToken::from_str_checked(raw_token) else {
            return Ok(ConfirmOutcome::InvalidOrUsed);
        };

        let outcome = self
            .verifier
            .verify_and_consume(&token, Timestamp::now())
            .map_err(|err| {
                error!(%err, "verify-and-consume failed");
                VerificationError::Transient
            })?;

        Ok(match outcome {
            VerifyOutcome::Verified {
                contact,
                email,
                book_category,
            } => {
                info!(%contact, "email verified");
                ConfirmOutcome::Verified {
                    email,
                    book_category,
                }
            }
            VerifyOutcome::Expired => ConfirmOutcome::Expired,
            VerifyOutcome::NotFound => ConfirmOutcome::InvalidOrUsed,
        })
    }

    /// Handle a plain signup (no book, no token). A duplicate email is a
    /// silent success, indistinguishable from a fresh one.
    pub fn signup(&self, name: &str, email: &str) -> Result<(), VerificationError> {
        let (name, email) = validate_identity(name, email).map_err(VerificationError::Validation)?;

        let contact = self
            .contacts
            .record_signup(&email, &name, Timestamp::now())
            .map_err(|err| {
                error!(%err, "signup write failed");
                VerificationError::Transient
            })?;

        info!(%contact, "signup recorded");
        Ok(())
    }
}
