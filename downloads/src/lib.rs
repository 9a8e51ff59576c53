//! Download gate.
//!
//! Releases book bytes only to contacts whose email is verified. The gate
//! deliberately reports one indistinguishable `Unauthorized` outcome for
//! "no such contact" and "contact not verified" so responses never reveal
//! whether an address is known to the system.

pub mod gate;

pub use gate::{DownloadError, DownloadGate};
