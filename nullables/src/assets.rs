//! Nullable asset store — in-memory category -> bytes map.

use std::collections::HashMap;
use std::sync::Mutex;

use continua_assets::{AssetError, AssetStore};
use continua_types::BookCategory;

/// An in-memory asset store for testing.
pub struct NullAssetStore {
    assets: Mutex<HashMap<BookCategory, Vec<u8>>>,
}

impl NullAssetStore {
    pub fn new() -> Self {
        Self {
            assets: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, category: BookCategory, bytes: Vec<u8>) {
        self.assets.lock().unwrap().insert(category, bytes);
    }
}

impl Default for NullAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore for NullAssetStore {
    fn fetch(&self, category: BookCategory) -> Result<Option<Vec<u8>>, AssetError> {
        Ok(self.assets.lock().unwrap().get(&category).cloned())
    }
}
