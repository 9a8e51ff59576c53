//! Abstract storage traits for the Continua verification service.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the workspace depends only on the traits.
//!
//! The ordinary contact surface ([`ContactStore`]) and the privileged
//! verify-and-consume operation ([`ContactVerifier`]) are separate traits
//! on purpose: consuming a token flips state the ordinary caller could not
//! reach through its own access, so that authority is held explicitly by
//! the one component that needs it rather than ambiently by everything
//! holding a store handle.

pub mod contact;
pub mod download_log;
pub mod error;

pub use contact::{ContactRecord, ContactStore, ContactVerifier, VerifyOutcome};
pub use download_log::{DownloadLogStore, DownloadRecord};
pub use error::StoreError;
