//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::byteorder::BigEndian;
use heed::types::{SerdeBincode, Str, Unit, U64};
use heed::{Database, Env, EnvOpenOptions};

use continua_store::{ContactRecord, DownloadRecord};

use crate::contact::LmdbContactStore;
use crate::LmdbError;

/// Default LMDB map size: 256 MiB, far beyond what a contact table needs.
pub const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    /// contact id -> full record.
    pub(crate) contacts: Database<U64<BigEndian>, SerdeBincode<ContactRecord>>,
    /// normalized email -> contact id (the uniqueness constraint).
    pub(crate) email_index: Database<Str, U64<BigEndian>>,
    /// live token -> contact id; entries die with the token.
    pub(crate) token_index: Database<Str, U64<BigEndian>>,
    /// "<contact id>/<category>" -> (); presence enforces one request per pair.
    pub(crate) book_requests: Database<Str, Unit>,
    /// append-only audit log keyed by sequence number.
    pub(crate) downloads: Database<U64<BigEndian>, SerdeBincode<DownloadRecord>>,
    /// internal counters ("next_contact_id", "next_download_seq").
    pub(crate) meta: Database<Str, U64<BigEndian>>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment directory is exclusively owned by this
        // process; we never open the same path twice within it.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let contacts = env.create_database(&mut wtxn, Some("contacts"))?;
        let email_index = env.create_database(&mut wtxn, Some("email_index"))?;
        let token_index = env.create_database(&mut wtxn, Some("token_index"))?;
        let book_requests = env.create_database(&mut wtxn, Some("book_requests"))?;
        let downloads = env.create_database(&mut wtxn, Some("downloads"))?;
        let meta = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            contacts,
            email_index,
            token_index,
            book_requests,
            downloads,
            meta,
        })
    }

    /// A store handle over this environment. Handles are cheap to create
    /// and share the underlying environment.
    pub fn contact_store(&self) -> LmdbContactStore {
        LmdbContactStore {
            env: Arc::clone(&self.env),
            contacts: self.contacts,
            email_index: self.email_index,
            token_index: self.token_index,
            book_requests: self.book_requests,
            downloads: self.downloads,
            meta: self.meta,
        }
    }
}
