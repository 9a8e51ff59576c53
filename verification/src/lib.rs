//! Email verification workflow.
//!
//! Orchestrates the token lifecycle end to end: issue a fresh token and
//! upsert the contact, dispatch the verification email, and later consume
//! the token exactly once. Per-contact states are
//! `Unknown → PendingVerification → Verified`; a re-request while pending
//! reissues (the old token dies), and a verified contact never regresses
//! through this flow.
//!
//! All collaborators (store, privileged verifier, mailer) are injected —
//! the workflow holds no process-wide state.

pub mod error;
pub mod outcomes;
pub mod validate;
pub mod workflow;

pub use error::VerificationError;
pub use outcomes::ConfirmOutcome;
pub use validate::{FieldErrors, MAX_NAME_LEN};
pub use workflow::{VerificationWorkflow, TOKEN_TTL_SECS};
