//! Nullable store — thread-safe in-memory storage for testing.
//!
//! All tables live behind a single mutex, so each trait operation is one
//! atomic unit — the same guarantee the LMDB backend gets from its write
//! transactions. That makes the double-submission race observable in tests
//! without a real database.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use continua_store::{
    ContactRecord, ContactStore, ContactVerifier, DownloadLogStore, DownloadRecord, StoreError,
    VerifyOutcome,
};
use continua_tokens::VerificationToken;
use continua_types::{BookCategory, ContactId, EmailAddress, Timestamp};

#[derive(Default)]
struct Tables {
    contacts: HashMap<u64, ContactRecord>,
    email_index: HashMap<String, u64>,
    token_index: HashMap<String, u64>,
    book_requests: BTreeSet<(u64, BookCategory)>,
    downloads: Vec<DownloadRecord>,
    next_id: u64,
    fail_download_log: bool,
}

/// An in-memory contact + download-log store for testing.
/// Thread-safe so concurrent-submission tests can share it across threads.
pub struct NullContactStore {
    tables: Mutex<Tables>,
}

impl NullContactStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_id: 1,
                ..Tables::default()
            }),
        }
    }

    /// Make subsequent `append_download` calls fail, for exercising the
    /// best-effort audit path.
    pub fn fail_download_log(&self, fail: bool) {
        self.tables.lock().unwrap().fail_download_log = fail;
    }

    /// Force a contact's token expiry into the past, for expiry tests.
    pub fn expire_token(&self, email: &EmailAddress, expires_at: Timestamp) {
        let mut tables = self.tables.lock().unwrap();
        let id = match tables.email_index.get(email.as_str()) {
            Some(id) => *id,
            None => return,
        };
        if let Some(record) = tables.contacts.get_mut(&id) {
            if record.verification_token.is_some() {
                record.verification_token_expires_at = Some(expires_at);
            }
        }
    }

    pub fn contact_count(&self) -> usize {
        self.tables.lock().unwrap().contacts.len()
    }
}

impl Default for NullContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore for NullContactStore {
    fn upsert_for_verification(
        &self,
        email: &EmailAddress,
        name: &str,
        token: &VerificationToken,
        expires_at: Timestamp,
        category: BookCategory,
    ) -> Result<ContactId, StoreError> {
        let mut tables = self.tables.lock().unwrap();

        let id = match tables.email_index.get(email.as_str()).copied() {
            Some(id) => {
                let superseded = {
                    let record = tables
                        .contacts
                        .get_mut(&id)
                        .ok_or_else(|| StoreError::Corruption(format!("contact:{id} missing")))?;
                    let old = record.verification_token.take();
                    record.verification_token = Some(token.clone());
                    record.verification_token_expires_at = Some(expires_at);
                    record.last_requested_category = Some(category);
                    old
                };
                // The index entry for the superseded token dies with it.
                if let Some(old) = superseded {
                    tables.token_index.remove(old.as_str());
                }
                id
            }
            None => {
                let id = tables.next_id;
                tables.next_id += 1;
                let record = ContactRecord {
                    id: ContactId(id),
                    email: email.clone(),
                    name: name.to_string(),
                    email_verified: false,
                    verification_token: Some(token.clone()),
                    verification_token_expires_at: Some(expires_at),
                    signed_up_at: None,
                    last_requested_category: Some(category),
                };
                tables.contacts.insert(id, record);
                tables.email_index.insert(email.as_str().to_string(), id);
                id
            }
        };

        tables.token_index.insert(token.as_str().to_string(), id);
        tables.book_requests.insert((id, category));
        Ok(ContactId(id))
    }

    fn record_signup(
        &self,
        email: &EmailAddress,
        name: &str,
        now: Timestamp,
    ) -> Result<ContactId, StoreError> {
        let mut tables = self.tables.lock().unwrap();

        if let Some(id) = tables.email_index.get(email.as_str()) {
            return Ok(ContactId(*id));
        }

        let id = tables.next_id;
        tables.next_id += 1;
        let record = ContactRecord {
            id: ContactId(id),
            email: email.clone(),
            name: name.to_string(),
            email_verified: false,
            verification_token: None,
            verification_token_expires_at: None,
            signed_up_at: Some(now),
            last_requested_category: None,
        };
        tables.contacts.insert(id, record);
        tables.email_index.insert(email.as_str().to_string(), id);
        Ok(ContactId(id))
    }

    fn get_contact(&self, email: &EmailAddress) -> Result<Option<ContactRecord>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .email_index
            .get(email.as_str())
            .and_then(|id| tables.contacts.get(id))
            .cloned())
    }

    fn book_requests(&self, contact: ContactId) -> Result<Vec<BookCategory>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .book_requests
            .iter()
            .filter(|(id, _)| *id == contact.as_u64())
            .map(|(_, category)| *category)
            .collect())
    }
}

impl ContactVerifier for NullContactStore {
    fn verify_and_consume(
        &self,
        token: &VerificationToken,
        now: Timestamp,
    ) -> Result<VerifyOutcome, StoreError> {
        let mut tables = self.tables.lock().unwrap();

        let Some(id) = tables.token_index.get(token.as_str()).copied() else {
            return Ok(VerifyOutcome::NotFound);
        };

        let record = tables
            .contacts
            .get_mut(&id)
            .ok_or_else(|| StoreError::Corruption(format!("contact:{id} missing")))?;

        if record.verification_token.as_ref() != Some(token) {
            return Err(StoreError::Corruption(format!(
                "token index out of sync for contact:{id}"
            )));
        }

        if let Some(expires_at) = record.verification_token_expires_at {
            if expires_at.is_past(now) {
                // No side effect on the expired path.
                return Ok(VerifyOutcome::Expired);
            }
        }

        record.email_verified = true;
        record.verification_token = None;
        record.verification_token_expires_at = None;
        let outcome = VerifyOutcome::Verified {
            contact: record.id,
            email: record.email.clone(),
            book_category: record.last_requested_category,
        };
        tables.token_index.remove(token.as_str());
        Ok(outcome)
    }
}

impl DownloadLogStore for NullContactStore {
    fn append_download(
        &self,
        contact: ContactId,
        category: BookCategory,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.fail_download_log {
            return Err(StoreError::Backend("download log unavailable".to_string()));
        }
        tables.downloads.push(DownloadRecord {
            contact,
            category,
            at,
        });
        Ok(())
    }

    fn downloads(&self) -> Result<Vec<DownloadRecord>, StoreError> {
        Ok(self.tables.lock().unwrap().downloads.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> EmailAddress {
        EmailAddress::parse(s).unwrap()
    }

    #[test]
    fn upsert_then_verify_round_trip() {
        let store = NullContactStore::new();
        let token = VerificationToken::generate();
        let id = store
            .upsert_for_verification(
                &email("reader@example.com"),
                "Reader",
                &token,
                Timestamp::new(100),
                BookCategory::Agents,
            )
            .unwrap();

        let outcome = store.verify_and_consume(&token, Timestamp::new(50)).unwrap();
        assert_eq!(
            outcome,
            VerifyOutcome::Verified {
                contact: id,
                email: email("reader@example.com"),
                book_category: Some(BookCategory::Agents),
            }
        );
        assert_eq!(
            store.verify_and_consume(&token, Timestamp::new(50)).unwrap(),
            VerifyOutcome::NotFound
        );
    }

    #[test]
    fn expire_token_helper_marks_token_expired() {
        let store = NullContactStore::new();
        let addr = email("reader@example.com");
        let token = VerificationToken::generate();
        store
            .upsert_for_verification(
                &addr,
                "Reader",
                &token,
                Timestamp::new(10_000),
                BookCategory::Agents,
            )
            .unwrap();

        store.expire_token(&addr, Timestamp::new(5));
        assert_eq!(
            store.verify_and_consume(&token, Timestamp::new(100)).unwrap(),
            VerifyOutcome::Expired
        );
    }

    #[test]
    fn forced_download_log_failure() {
        let store = NullContactStore::new();
        store.fail_download_log(true);
        let result = store.append_download(ContactId(1), BookCategory::Agents, Timestamp::new(1));
        assert!(result.is_err());
        assert!(store.downloads().unwrap().is_empty());
    }
}
