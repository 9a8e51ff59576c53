//! LMDB storage backend for the Continua verification service.
//!
//! Implements the storage traits from `continua-store` using the `heed`
//! LMDB bindings. All tables live in a single environment, and every trait
//! operation runs inside one LMDB write transaction: LMDB permits a single
//! writer at a time, which is exactly the serialization the contact-upsert
//! and verify-and-consume contracts require.

pub mod contact;
pub mod environment;
pub mod error;

pub use contact::LmdbContactStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
