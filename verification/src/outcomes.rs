//! User-visible outcomes of the confirm step.

use continua_types::{BookCategory, EmailAddress};

/// Result of submitting a verification token.
///
/// `InvalidOrUsed` covers both "never existed" and "already consumed" —
/// one indistinguishable answer, so responses cannot be used to probe
/// which tokens ever existed. `Expired` is intentionally distinguishable
/// so the user knows to request a fresh link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Verified {
        email: EmailAddress,
        /// The contact's most recent book request, carried through the
        /// atomic consume so the caller can chain straight to a download.
        book_category: Option<BookCategory>,
    },
    InvalidOrUsed,
    Expired,
}
