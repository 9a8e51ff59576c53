//! The dispatch trait and verification-URL construction.

use continua_tokens::VerificationToken;
use continua_types::EmailAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email provider request failed: {0}")]
    Transport(String),

    #[error("email provider rejected the message: status {status}")]
    Rejected { status: u16 },
}

/// Narrow contract for sending a verification email.
pub trait EmailDispatch: Send + Sync {
    fn send_verification(
        &self,
        to: &EmailAddress,
        name: &str,
        token: &VerificationToken,
    ) -> Result<(), DeliveryError>;
}

/// Build the verification URL embedded in the email:
/// `<site-base>/verify/<token>`.
pub fn verification_url(site_base_url: &str, token: &VerificationToken) -> String {
    format!(
        "{}/verify/{}",
        site_base_url.trim_end_matches('/'),
        token.as_str()
    )
}
