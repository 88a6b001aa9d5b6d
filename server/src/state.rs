//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;

use crate::config::Config;
use crate::keys::{KeyHasher, KeyStore, KeyStoreError};

/// Shared application state for the keygate server.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
    /// The single key store for this process.
    pub key_store: KeyStore,
}

impl AppState {
    /// Build state from configuration. Fails only when the hashing
    /// parameters are rejected, which should abort startup.
    pub fn new(config: Config) -> Result<Self, KeyStoreError> {
        let hasher = KeyHasher::new(&config.hashing)?;
        Ok(Self {
            config: Arc::new(config),
            key_store: KeyStore::new(hasher),
        })
    }
}
