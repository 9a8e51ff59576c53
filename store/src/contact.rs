//! Contact storage traits.

use crate::StoreError;
use continua_tokens::VerificationToken;
use continua_types::{BookCategory, ContactId, EmailAddress, Timestamp};
use serde::{Deserialize, Serialize};

/// Per-contact information stored by the service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: ContactId,
    /// Normalized address; the uniqueness key.
    pub email: EmailAddress,
    pub name: String,
    pub email_verified: bool,
    /// The live token, if any. `None` whenever `email_verified` is true.
    pub verification_token: Option<VerificationToken>,
    pub verification_token_expires_at: Option<Timestamp>,
    /// Set by the signup flow; independent of the token lifecycle.
    pub signed_up_at: Option<Timestamp>,
    /// Most recent book request, refreshed on every verification upsert.
    /// Lets the confirm step hand its caller a download target without a
    /// second lookup.
    pub last_requested_category: Option<BookCategory>,
}

/// Result of the atomic verify-and-consume operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Token matched a contact and was live: the verified flag is now set
    /// and the token cleared, all in the same atomic unit.
    Verified {
        contact: ContactId,
        email: EmailAddress,
        book_category: Option<BookCategory>,
    },
    /// Token matched but its expiry is in the past. The token is left in
    /// place, so re-submitting yields `Expired` again, never `NotFound`.
    Expired,
    /// No contact currently carries this token — it never existed or was
    /// already consumed. Callers must not distinguish the two.
    NotFound,
}

/// Ordinary contact storage operations.
///
/// Implementations must make each method a single atomic unit so that
/// concurrent requests for the same email serialize at the storage layer.
pub trait ContactStore: Send + Sync {
    /// Create-or-refresh a contact for a verification request, keyed by
    /// normalized email.
    ///
    /// New contact: created unverified with the given token/expiry and
    /// name. Existing contact: token and expiry are overwritten (the old
    /// token dies), name and verified flag are left untouched. In both
    /// cases a book request for `(contact, category)` is recorded, with a
    /// duplicate pair being a silent no-op, and the contact's
    /// `last_requested_category` is refreshed. A unique-constraint race on
    /// the insert must fold into the update path, never surface as an
    /// error.
    fn upsert_for_verification(
        &self,
        email: &EmailAddress,
        name: &str,
        token: &VerificationToken,
        expires_at: Timestamp,
        category: BookCategory,
    ) -> Result<ContactId, StoreError>;

    /// Record a plain signup (no token involved). Creates the contact with
    /// `signed_up_at = now`; if the email already exists this is a silent
    /// success that touches nothing.
    fn record_signup(
        &self,
        email: &EmailAddress,
        name: &str,
        now: Timestamp,
    ) -> Result<ContactId, StoreError>;

    /// Look up a contact by normalized email.
    fn get_contact(&self, email: &EmailAddress) -> Result<Option<ContactRecord>, StoreError>;

    /// Book categories requested by a contact, for audit and tests.
    fn book_requests(&self, contact: ContactId) -> Result<Vec<BookCategory>, StoreError>;
}

/// The privileged verify-and-consume operation.
///
/// Separate from [`ContactStore`]: looking up a contact *by token* and
/// flipping its verified flag bypasses the per-caller access an ordinary
/// caller has, so the capability is granted explicitly and only to the
/// confirm step.
pub trait ContactVerifier: Send + Sync {
    /// Atomically look up the contact holding `token` and consume it.
    ///
    /// Exactly one of two concurrent callers submitting the same live token
    /// observes `Verified`; the other observes `NotFound`. Expiry is judged
    /// against the supplied `now` and has no side effect.
    fn verify_and_consume(
        &self,
        token: &VerificationToken,
        now: Timestamp,
    ) -> Result<VerifyOutcome, StoreError>;
}
