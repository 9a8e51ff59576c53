//! Asset store trait and filesystem implementation.

use continua_types::BookCategory;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset backend error: {0}")]
    Backend(String),
}

/// Narrow contract for fetching a protected asset by category.
pub trait AssetStore: Send + Sync {
    /// `Ok(None)` means the asset genuinely does not exist in storage —
    /// distinct from a backend failure.
    fn fetch(&self, category: BookCategory) -> Result<Option<Vec<u8>>, AssetError>;
}

/// Filesystem-backed asset store: `<dir>/<category>.pdf`.
pub struct FsAssetStore {
    dir: PathBuf,
}

impl FsAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, category: BookCategory) -> PathBuf {
        self.dir.join(format!("{}.pdf", category.as_str()))
    }
}

impl AssetStore for FsAssetStore {
    fn fetch(&self, category: BookCategory) -> Result<Option<Vec<u8>>, AssetError> {
        match std::fs::read(self.path_for(category)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AssetError::Backend(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fetch_reads_category_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("agents.pdf"), b"pdf bytes").unwrap();

        let store = FsAssetStore::new(dir.path());
        let bytes = store.fetch(BookCategory::Agents).unwrap().unwrap();
        assert_eq!(bytes, b"pdf bytes");
    }

    #[test]
    fn missing_file_is_none_not_error() {
        let dir = TempDir::new().unwrap();
        let store = FsAssetStore::new(dir.path());
        assert!(store.fetch(BookCategory::Publishers).unwrap().is_none());
    }
}
