//! Private book asset store.
//!
//! Stand-in for the original hosted storage bucket: a directory of
//! `<category>.pdf` files readable only by the server process. The gate
//! reaches it through the narrow [`AssetStore`] trait.

pub mod store;

pub use store::{AssetError, AssetStore, FsAssetStore};
