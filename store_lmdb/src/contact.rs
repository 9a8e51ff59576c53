//! LMDB implementation of the contact, verifier, and download-log traits.
//!
//! Every trait method is one LMDB write (or read) transaction. LMDB allows
//! a single write transaction at a time, so concurrent upserts for the same
//! email and duplicate submissions of the same token serialize here rather
//! than racing in calling code.

use std::str::FromStr;
use std::sync::Arc;

use heed::byteorder::BigEndian;
use heed::types::{SerdeBincode, Str, Unit, U64};
use heed::{Database, Env, RwTxn};

use continua_store::{
    ContactRecord, ContactStore, ContactVerifier, DownloadLogStore, DownloadRecord, StoreError,
    VerifyOutcome,
};
use continua_tokens::VerificationToken;
use continua_types::{BookCategory, ContactId, EmailAddress, Timestamp};

use crate::LmdbError;

const NEXT_CONTACT_ID: &str = "next_contact_id";
const NEXT_DOWNLOAD_SEQ: &str = "next_download_seq";

pub struct LmdbContactStore {
    pub(crate) env: Arc<Env>,
    pub(crate) contacts: Database<U64<BigEndian>, SerdeBincode<ContactRecord>>,
    pub(crate) email_index: Database<Str, U64<BigEndian>>,
    pub(crate) token_index: Database<Str, U64<BigEndian>>,
    pub(crate) book_requests: Database<Str, Unit>,
    pub(crate) downloads: Database<U64<BigEndian>, SerdeBincode<DownloadRecord>>,
    pub(crate) meta: Database<Str, U64<BigEndian>>,
}

impl LmdbContactStore {
    /// Allocate the next value of a named counter (starting at 1).
    fn next_seq(&self, wtxn: &mut RwTxn, key: &str) -> Result<u64, LmdbError> {
        let next = self.meta.get(wtxn, key)?.unwrap_or(1);
        self.meta.put(wtxn, key, &(next + 1))?;
        Ok(next)
    }

    fn request_key(contact: ContactId, category: BookCategory) -> String {
        // Zero-padded so per-contact keys share a prefix in sorted order.
        format!("{:020}/{}", contact.as_u64(), category.as_str())
    }
}

impl ContactStore for LmdbContactStore {
    fn upsert_for_verification(
        &self,
        email: &EmailAddress,
        name: &str,
        token: &VerificationToken,
        expires_at: Timestamp,
        category: BookCategory,
    ) -> Result<ContactId, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let id = match self
            .email_index
            .get(&wtxn, email.as_str())
            .map_err(LmdbError::from)?
        {
            Some(raw) => {
                // Existing contact: overwrite the token state, leave name
                // and verified flag alone.
                let id = ContactId(raw);
                let mut record = self
                    .contacts
                    .get(&wtxn, &raw)
                    .map_err(LmdbError::from)?
                    .ok_or_else(|| StoreError::Corruption(format!("{id} indexed but missing")))?;

                if let Some(old) = record.verification_token.take() {
                    self.token_index
                        .delete(&mut wtxn, old.as_str())
                        .map_err(LmdbError::from)?;
                }
                record.verification_token = Some(token.clone());
                record.verification_token_expires_at = Some(expires_at);
                record.last_requested_category = Some(category);

                self.contacts
                    .put(&mut wtxn, &raw, &record)
                    .map_err(LmdbError::from)?;
                id
            }
            None => {
                let raw = self
                    .next_seq(&mut wtxn, NEXT_CONTACT_ID)
                    .map_err(LmdbError::from)?;
                let id = ContactId(raw);
                let record = ContactRecord {
                    id,
                    email: email.clone(),
                    name: name.to_string(),
                    email_verified: false,
                    verification_token: Some(token.clone()),
                    verification_token_expires_at: Some(expires_at),
                    signed_up_at: None,
                    last_requested_category: Some(category),
                };
                self.contacts
                    .put(&mut wtxn, &raw, &record)
                    .map_err(LmdbError::from)?;
                self.email_index
                    .put(&mut wtxn, email.as_str(), &raw)
                    .map_err(LmdbError::from)?;
                id
            }
        };

        self.token_index
            .put(&mut wtxn, token.as_str(), &id.as_u64())
            .map_err(LmdbError::from)?;

        // Duplicate (contact, category) pairs are a silent no-op.
        let key = Self::request_key(id, category);
        self.book_requests
            .put(&mut wtxn, &key, &())
            .map_err(LmdbError::from)?;

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(id)
    }

    fn record_signup(
        &self,
        email: &EmailAddress,
        name: &str,
        now: Timestamp,
    ) -> Result<ContactId, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        // Duplicate email folds into success without touching the row.
        if let Some(raw) = self
            .email_index
            .get(&wtxn, email.as_str())
            .map_err(LmdbError::from)?
        {
            return Ok(ContactId(raw));
        }

        let raw = self
            .next_seq(&mut wtxn, NEXT_CONTACT_ID)
            .map_err(LmdbError::from)?;
        let id = ContactId(raw);
        let record = ContactRecord {
            id,
            email: email.clone(),
            name: name.to_string(),
            email_verified: false,
            verification_token: None,
            verification_token_expires_at: None,
            signed_up_at: Some(now),
            last_requested_category: None,
        };
        self.contacts
            .put(&mut wtxn, &raw, &record)
            .map_err(LmdbError::from)?;
        self.email_index
            .put(&mut wtxn, email.as_str(), &raw)
            .map_err(LmdbError::from)?;

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(id)
    }

    fn get_contact(&self, email: &EmailAddress) -> Result<Option<ContactRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(raw) = self
            .email_index
            .get(&rtxn, email.as_str())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let record = self
            .contacts
            .get(&rtxn, &raw)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!("contact:{raw} indexed but missing"))
            })?;
        Ok(Some(record))
    }

    fn book_requests(&self, contact: ContactId) -> Result<Vec<BookCategory>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = format!("{:020}/", contact.as_u64());
        let mut out = Vec::new();
        let iter = self
            .book_requests
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for entry in iter {
            let (key, ()) = entry.map_err(LmdbError::from)?;
            let category = key
                .strip_prefix(&prefix)
                .and_then(|s| BookCategory::from_str(s).ok())
                .ok_or_else(|| {
                    StoreError::Corruption(format!("malformed book request key: {key}"))
                })?;
            out.push(category);
        }
        Ok(out)
    }
}

impl ContactVerifier for LmdbContactStore {
    fn verify_and_consume(
        &self,
        token: &VerificationToken,
        now: Timestamp,
    ) -> Result<VerifyOutcome, StoreError> {
        // A write transaction even on the failure paths: the token lookup
        // and the consume must be one serialized unit so that duplicate
        // submissions see either the live token or nothing, never a
        // half-consumed state.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let Some(raw) = self
            .token_index
            .get(&wtxn, token.as_str())
            .map_err(LmdbError::from)?
        else {
            return Ok(VerifyOutcome::NotFound);
        };

        let mut record = self
            .contacts
            .get(&wtxn, &raw)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!("contact:{raw} indexed but missing"))
            })?;

        if record.verification_token.as_ref() != Some(token) {
            return Err(StoreError::Corruption(format!(
                "token index out of sync for contact:{raw}"
            )));
        }

        match record.verification_token_expires_at {
            Some(expires_at) if expires_at.is_past(now) => {
                // Token stays in place: re-submitting an expired token must
                // keep reporting Expired, not NotFound.
                Ok(VerifyOutcome::Expired)
            }
            _ => {
                record.email_verified = true;
                record.verification_token = None;
                record.verification_token_expires_at = None;
                self.contacts
                    .put(&mut wtxn, &raw, &record)
                    .map_err(LmdbError::from)?;
                self.token_index
                    .delete(&mut wtxn, token.as_str())
                    .map_err(LmdbError::from)?;
                wtxn.commit().map_err(LmdbError::from)?;
                Ok(VerifyOutcome::Verified {
                    contact: record.id,
                    email: record.email,
                    book_category: record.last_requested_category,
                })
            }
        }
    }
}

impl DownloadLogStore for LmdbContactStore {
    fn append_download(
        &self,
        contact: ContactId,
        category: BookCategory,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = self
            .next_seq(&mut wtxn, NEXT_DOWNLOAD_SEQ)
            .map_err(LmdbError::from)?;
        let record = DownloadRecord {
            contact,
            category,
            at,
        };
        self.downloads
            .put(&mut wtxn, &seq, &record)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn downloads(&self) -> Result<Vec<DownloadRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for entry in self.downloads.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, record) = entry.map_err(LmdbError::from)?;
            out.push(record);
        }
        Ok(out)
    }
}
