//! Resend HTTP API mailer.

use std::time::Duration;

use continua_tokens::VerificationToken;
use continua_types::EmailAddress;
use serde::Serialize;

use crate::dispatch::{verification_url, DeliveryError, EmailDispatch};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

/// Sends verification email through the Resend API.
pub struct ResendMailer {
    client: reqwest::blocking::Client,
    api_key: String,
    from_address: String,
    site_base_url: String,
}

impl ResendMailer {
    pub fn new(
        api_key: impl Into<String>,
        from_address: impl Into<String>,
        site_base_url: impl Into<String>,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("static client options");
        Self {
            client,
            api_key: api_key.into(),
            from_address: from_address.into(),
            site_base_url: site_base_url.into(),
        }
    }

    fn render_html(name: &str, url: &str) -> String {
        format!(
            "<p>Hi {name},</p>\
             <p>Please confirm your email address to receive your Book download:</p>\
             <p><a href=\"{url}\">Verify your email</a></p>\
             <p>This link expires in 24 hours. If you didn't request it, you can \
             safely ignore this message.</p>"
        )
    }
}

impl EmailDispatch for ResendMailer {
    fn send_verification(
        &self,
        to: &EmailAddress,
        name: &str,
        token: &VerificationToken,
    ) -> Result<(), DeliveryError> {
        let url = verification_url(&self.site_base_url, token);
        let body = SendEmailBody {
            from: &self.from_address,
            to: [to.as_str()],
            subject: "Verify your email — Continua",
            html: Self::render_html(name, &url),
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                to = %to,
                "resend rejected verification email"
            );
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(to = %to, "verification email dispatched");
        Ok(())
    }
}
