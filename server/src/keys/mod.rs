//! In-memory API key store.
//!
//! [`KeyStore`] owns every issued key record. The plaintext credential is
//! handed out exactly once, inside the [`IssuedKey`] returned by
//! [`KeyStore::create`]; the store keeps only an Argon2id hash of it.
//! Listing returns [`KeySummary`] values, which have no plaintext field at all.
//!
//! ## Design
//!
//! - **Ordering**: records live in an [`IndexMap`] keyed by id, so listing
//!   follows insertion order and deletion (`shift_remove`) keeps the order of
//!   the remaining records.
//! - **Locking**: one `RwLock` around the map. Hashing and verification are
//!   slow on purpose, so neither runs while the lock is held: `create` hashes
//!   before taking the write lock and `validate` verifies against a snapshot.
//! - **Expiry**: `expires_at` is informational. Validation does not look at it.

pub mod hasher;

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub use hasher::{HashConfig, KeyHasher};

/// Days between creation and the advertised expiry date.
pub const KEY_LIFETIME_DAYS: i64 = 180;

/// Number of leading plaintext characters kept for display.
pub const PREFIX_LEN: usize = 8;

/// Errors from the hashing primitive.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("invalid hashing parameters: {0}")]
    InvalidHashParams(String),

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// Result of a successful [`KeyStore::create`] call. This is the only type
/// that ever carries the plaintext credential.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedKey {
    pub id: String,
    pub api_key: String,
    pub prefix: String,
    pub masked_key: String,
    pub expires_at: NaiveDate,
}

impl std::fmt::Debug for IssuedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedKey")
            .field("id", &self.id)
            .field("api_key", &"<redacted>")
            .field("prefix", &self.prefix)
            .field("masked_key", &self.masked_key)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Display-safe view of a stored key, as returned by [`KeyStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySummary {
    pub id: String,
    pub prefix: String,
    pub masked_key: String,
    pub expires_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

struct StoredKey {
    secret_hash: String,
    created_at: DateTime<Utc>,
    expires_at: NaiveDate,
    prefix: String,
    masked_key: String,
}

/// Shared handle to the key collection. Cloning is cheap; all clones see the
/// same records.
#[derive(Clone)]
pub struct KeyStore {
    keys: Arc<RwLock<IndexMap<String, StoredKey>>>,
    hasher: KeyHasher,
}

impl KeyStore {
    pub fn new(hasher: KeyHasher) -> Self {
        Self {
            keys: Arc::new(RwLock::new(IndexMap::new())),
            hasher,
        }
    }

    /// Issue a new credential and store its hash.
    ///
    /// Blocks for the duration of one Argon2id hash; call from a blocking
    /// context when running inside an async runtime.
    pub fn create(&self) -> Result<IssuedKey, KeyStoreError> {
        self.create_at(Utc::now())
    }

    pub(crate) fn create_at(&self, now: DateTime<Utc>) -> Result<IssuedKey, KeyStoreError> {
        let api_key = Uuid::new_v4().to_string();
        let id = format!("key_{}", Uuid::new_v4());
        let secret_hash = self.hasher.hash(&api_key)?;

        let prefix: String = api_key.chars().take(PREFIX_LEN).collect();
        let masked_key = format!("{prefix}...");
        let expires_at = (now + Duration::days(KEY_LIFETIME_DAYS)).date_naive();

        let record = StoredKey {
            secret_hash,
            created_at: now,
            expires_at,
            prefix: prefix.clone(),
            masked_key: masked_key.clone(),
        };
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), record);

        info!(id = %id, prefix = %prefix, %expires_at, "API key created");

        Ok(IssuedKey {
            id,
            api_key,
            prefix,
            masked_key,
            expires_at,
        })
    }

    /// All stored keys in insertion order, without secrets.
    pub fn list(&self) -> Vec<KeySummary> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, k)| KeySummary {
                id: id.clone(),
                prefix: k.prefix.clone(),
                masked_key: k.masked_key.clone(),
                expires_at: k.expires_at,
                created_at: k.created_at,
            })
            .collect()
    }

    /// Remove the key with the given id. Returns `false` if there is none.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self
            .keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(id)
            .is_some();
        if removed {
            info!(id = %id, "API key deleted");
        }
        removed
    }

    /// Whether `candidate` matches any stored key. Missing or empty input is
    /// never valid. Linear in the number of stored keys, stopping at the
    /// first match.
    pub fn validate(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate.filter(|c| !c.is_empty()) else {
            return false;
        };

        let hashes: Vec<String> = self
            .keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|k| k.secret_hash.clone())
            .collect();

        hashes.iter().any(|h| self.hasher.verify(candidate, h))
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn store() -> KeyStore {
        let hasher = KeyHasher::new(&HashConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        KeyStore::new(hasher)
    }

    #[test]
    fn test_create_shape() {
        let store = store();
        let key = store.create().unwrap();

        assert!(key.id.starts_with("key_"));
        assert!(Uuid::parse_str(&key.api_key).is_ok());
        assert_eq!(key.prefix, &key.api_key[..8]);
        assert_eq!(key.masked_key, format!("{}...", key.prefix));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expiry_is_180_days_after_creation() {
        let store = store();
        let now = "2026-01-15T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let key = store.create_at(now).unwrap();
        assert_eq!(key.expires_at, NaiveDate::from_ymd_opt(2026, 7, 14).unwrap());

        let listed = &store.list()[0];
        assert_eq!(listed.created_at, now);
        assert_eq!(listed.expires_at, key.expires_at);
    }

    #[test]
    fn test_list_hides_plaintext() {
        let store = store();
        let key = store.create().unwrap();
        let listed = store.list();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, key.id);
        assert_eq!(listed[0].prefix, key.prefix);
        assert_eq!(listed[0].masked_key, key.masked_key);

        let json = serde_json::to_value(&listed).unwrap();
        assert!(json[0].get("apiKey").is_none());
        assert!(!json.to_string().contains(&key.api_key));
    }

    #[test]
    fn test_issued_key_debug_redacts_plaintext() {
        let store = store();
        let key = store.create().unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains(&key.api_key));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_validate() {
        let store = store();
        let key = store.create().unwrap();

        assert!(store.validate(Some(&key.api_key)));
        assert!(!store.validate(Some(&key.prefix)));
        assert!(!store.validate(Some("not-a-key")));
        assert!(!store.validate(Some("")));
        assert!(!store.validate(None));
    }

    #[test]
    fn test_validate_empty_store() {
        let store = store();
        assert!(!store.validate(Some("anything")));
    }

    #[test]
    fn test_validate_ignores_expiry() {
        let store = store();
        let long_ago = Utc::now() - Duration::days(365);
        let key = store.create_at(long_ago).unwrap();

        assert!(key.expires_at < Utc::now().date_naive());
        assert!(store.validate(Some(&key.api_key)));
    }

    #[test]
    fn test_uniqueness() {
        let store = store();
        let keys: Vec<IssuedKey> = (0..20).map(|_| store.create().unwrap()).collect();

        let ids: HashSet<&str> = keys.iter().map(|k| k.id.as_str()).collect();
        let secrets: HashSet<&str> = keys.iter().map(|k| k.api_key.as_str()).collect();
        assert_eq!(ids.len(), 20);
        assert_eq!(secrets.len(), 20);
    }

    #[test]
    fn test_delete_once() {
        let store = store();
        let key = store.create().unwrap();

        assert!(store.delete(&key.id));
        assert!(!store.delete(&key.id));
        assert!(store.is_empty());
        assert!(!store.validate(Some(&key.api_key)));
    }

    #[test]
    fn test_delete_unknown() {
        let store = store();
        store.create().unwrap();
        assert!(!store.delete("key_missing"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_preserves_order() {
        let store = store();
        let a = store.create().unwrap();
        let b = store.create().unwrap();
        let c = store.create().unwrap();

        assert!(store.delete(&b.id));
        let ids: Vec<String> = store.list().into_iter().map(|k| k.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn test_each_key_validates_independently() {
        let store = store();
        let a = store.create().unwrap();
        let b = store.create().unwrap();

        assert!(store.delete(&a.id));
        assert!(!store.validate(Some(&a.api_key)));
        assert!(store.validate(Some(&b.api_key)));
    }

    #[test]
    fn test_clones_share_records() {
        let store = store();
        let other = store.clone();
        let key = store.create().unwrap();
        assert!(other.validate(Some(&key.api_key)));
        assert_eq!(other.list().len(), 1);
    }

    #[test]
    fn test_concurrent_creates() {
        let store = store();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = store.clone();
                std::thread::spawn(move || s.create().unwrap().id)
            })
            .collect();
        let ids: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.len(), 8);
    }
}
