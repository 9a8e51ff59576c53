use thiserror::Error;

/// Failures surfaced by the storage traits.
///
/// Expected conditions (missing contact, duplicate email, duplicate book
/// request) are part of each operation's return type, not errors — so the
/// error surface is only what a caller cannot handle: a backend that
/// failed, or stored state that contradicts itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
