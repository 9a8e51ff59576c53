//! RPC request and response shapes.
//!
//! Field names are camelCase on the wire to match the frontend forms.

use serde::{Deserialize, Serialize};

// ── Verification request ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestVerificationRequest {
    pub name: String,
    pub email: String,
    pub book_category: String,
}

// ── Verify ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_category: Option<String>,
}

// ── Signup ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
}

// ── Download ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DownloadQuery {
    pub email: Option<String>,
}

// ── Shared ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
