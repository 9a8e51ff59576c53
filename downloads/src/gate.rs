//! The gate itself.

use std::sync::Arc;

use continua_assets::AssetStore;
use continua_store::{ContactStore, DownloadLogStore};
use continua_types::{BookCategory, EmailAddress, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Contact missing or not verified — callers must not distinguish.
    #[error("email not verified")]
    Unauthorized,

    /// The contact is authorized but the asset is absent from storage.
    #[error("book asset not found: {0}")]
    AssetMissing(BookCategory),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Policy check in front of the asset store.
pub struct DownloadGate {
    contacts: Arc<dyn ContactStore>,
    log: Arc<dyn DownloadLogStore>,
    assets: Arc<dyn AssetStore>,
}

impl DownloadGate {
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        log: Arc<dyn DownloadLogStore>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            contacts,
            log,
            assets,
        }
    }

    /// Release the asset bytes for `category` iff the contact behind
    /// `email` is verified.
    ///
    /// Each grant is appended to the audit log best-effort: a logging
    /// failure is traced but never blocks the response.
    pub fn authorize_and_fetch(
        &self,
        category: BookCategory,
        email: &EmailAddress,
    ) -> Result<Vec<u8>, DownloadError> {
        let record = self
            .contacts
            .get_contact(email)
            .map_err(|e| DownloadError::Storage(e.to_string()))?;

        let record = match record {
            Some(r) if r.email_verified => r,
            // Unknown contact and unverified contact are the same outcome.
            _ => return Err(DownloadError::Unauthorized),
        };

        if let Err(e) = self.log.append_download(record.id, category, Timestamp::now()) {
            tracing::error!(
                contact = %record.id,
                %category,
                error = %e,
                "failed to log book download"
            );
        }

        let bytes = self
            .assets
            .fetch(category)
            .map_err(|e| DownloadError::Storage(e.to_string()))?
            .ok_or(DownloadError::AssetMissing(category))?;

        tracing::info!(contact = %record.id, %category, "book download granted");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use continua_nullables::{NullAssetStore, NullContactStore};
    use continua_store::ContactVerifier;
    use continua_tokens::VerificationToken;

    fn email(s: &str) -> EmailAddress {
        EmailAddress::parse(s).unwrap()
    }

    fn gate_with(
        store: Arc<NullContactStore>,
        assets: Arc<NullAssetStore>,
    ) -> DownloadGate {
        DownloadGate::new(store.clone(), store, assets)
    }

    fn seeded_assets() -> Arc<NullAssetStore> {
        let assets = NullAssetStore::new();
        assets.insert(BookCategory::Therapists, b"therapists pdf".to_vec());
        assets.insert(BookCategory::Agents, b"agents pdf".to_vec());
        Arc::new(assets)
    }

    #[test]
    fn unknown_contact_is_unauthorized() {
        let store = Arc::new(NullContactStore::new());
        let gate = gate_with(store, seeded_assets());

        let result = gate.authorize_and_fetch(BookCategory::Therapists, &email("who@example.com"));
        assert!(matches!(result, Err(DownloadError::Unauthorized)));
    }

    #[test]
    fn unverified_contact_is_unauthorized_then_allowed_after_verify() {
        let store = Arc::new(NullContactStore::new());
        let addr = email("reader@example.com");
        let token = VerificationToken::generate();
        store
            .upsert_for_verification(
                &addr,
                "Reader",
                &token,
                Timestamp::new(u64::MAX),
                BookCategory::Therapists,
            )
            .unwrap();

        let gate = gate_with(store.clone(), seeded_assets());

        let denied = gate.authorize_and_fetch(BookCategory::Therapists, &addr);
        assert!(matches!(denied, Err(DownloadError::Unauthorized)));

        store.verify_and_consume(&token, Timestamp::new(1)).unwrap();

        let bytes = gate.authorize_and_fetch(BookCategory::Therapists, &addr).unwrap();
        assert_eq!(bytes, b"therapists pdf");
    }

    #[test]
    fn grant_appends_audit_row() {
        let store = Arc::new(NullContactStore::new());
        let addr = email("reader@example.com");
        let token = VerificationToken::generate();
        let id = store
            .upsert_for_verification(
                &addr,
                "Reader",
                &token,
                Timestamp::new(u64::MAX),
                BookCategory::Agents,
            )
            .unwrap();
        store.verify_and_consume(&token, Timestamp::new(1)).unwrap();

        let gate = gate_with(store.clone(), seeded_assets());
        gate.authorize_and_fetch(BookCategory::Agents, &addr).unwrap();
        gate.authorize_and_fetch(BookCategory::Agents, &addr).unwrap();

        let log = store.downloads().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|d| d.contact == id && d.category == BookCategory::Agents));
    }

    #[test]
    fn missing_asset_is_distinct_from_unauthorized() {
        let store = Arc::new(NullContactStore::new());
        let addr = email("reader@example.com");
        let token = VerificationToken::generate();
        store
            .upsert_for_verification(
                &addr,
                "Reader",
                &token,
                Timestamp::new(u64::MAX),
                BookCategory::Publishers,
            )
            .unwrap();
        store.verify_and_consume(&token, Timestamp::new(1)).unwrap();

        // No publishers asset seeded.
        let gate = gate_with(store, seeded_assets());
        let result = gate.authorize_and_fetch(BookCategory::Publishers, &addr);
        assert!(matches!(
            result,
            Err(DownloadError::AssetMissing(BookCategory::Publishers))
        ));
    }

    #[test]
    fn audit_failure_does_not_block_download() {
        let store = Arc::new(NullContactStore::new());
        let addr = email("reader@example.com");
        let token = VerificationToken::generate();
        store
            .upsert_for_verification(
                &addr,
                "Reader",
                &token,
                Timestamp::new(u64::MAX),
                BookCategory::Agents,
            )
            .unwrap();
        store.verify_and_consume(&token, Timestamp::new(1)).unwrap();
        store.fail_download_log(true);

        let gate = gate_with(store.clone(), seeded_assets());
        let bytes = gate.authorize_and_fetch(BookCategory::Agents, &addr).unwrap();
        assert_eq!(bytes, b"agents pdf");
        assert!(store.downloads().unwrap().is_empty());
    }
}
