//! Nullable mailer — records sends instead of dispatching them.

use std::sync::Mutex;

use continua_delivery::{DeliveryError, EmailDispatch};
use continua_tokens::VerificationToken;
use continua_types::EmailAddress;

/// One recorded send.
#[derive(Clone, Debug)]
pub struct SentMail {
    pub to: EmailAddress,
    pub name: String,
    pub token: VerificationToken,
}

/// A deterministic mailer for testing.
///
/// Records every send; can be switched into a failing mode to exercise
/// the dispatch-failed-after-persistence path.
pub struct NullMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: Mutex<bool>,
}

impl NullMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    /// Make subsequent sends fail.
    pub fn fail_sends(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// All recorded sends, in order.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recently sent token, if any.
    pub fn last_token(&self) -> Option<VerificationToken> {
        self.sent.lock().unwrap().last().map(|m| m.token.clone())
    }
}

impl Default for NullMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailDispatch for NullMailer {
    fn send_verification(
        &self,
        to: &EmailAddress,
        name: &str,
        token: &VerificationToken,
    ) -> Result<(), DeliveryError> {
        if *self.fail.lock().unwrap() {
            return Err(DeliveryError::Transport("null mailer set to fail".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.clone(),
            name: name.to_string(),
            token: token.clone(),
        });
        Ok(())
    }
}
