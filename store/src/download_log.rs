//! Download audit log storage trait.

use crate::StoreError;
use continua_types::{BookCategory, ContactId, Timestamp};
use serde::{Deserialize, Serialize};

/// One granted download. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub contact: ContactId,
    pub category: BookCategory,
    pub at: Timestamp,
}

/// Trait for the append-only download audit log.
pub trait DownloadLogStore: Send + Sync {
    /// Append a grant record. Callers treat failure as non-fatal.
    fn append_download(
        &self,
        contact: ContactId,
        category: BookCategory,
        at: Timestamp,
    ) -> Result<(), StoreError>;

    /// All recorded downloads, oldest first.
    fn downloads(&self) -> Result<Vec<DownloadRecord>, StoreError>;
}
