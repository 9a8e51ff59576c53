//! Email dispatch collaborator.
//!
//! The workflow core only sees the narrow [`EmailDispatch`] trait; the
//! production implementation posts to the Resend HTTP API. Core crates are
//! synchronous, so the client here is blocking — the rpc layer runs
//! workflow calls under `spawn_blocking`.

pub mod dispatch;
pub mod resend;

pub use dispatch::{verification_url, DeliveryError, EmailDispatch};
pub use resend::ResendMailer;
