//! Per-provider API keys.
//!
//! Keys live in an explicit `provider id → secret` mapping that is handed to
//! the dispatch service, so nothing reads ambient storage mid-call.

use std::collections::HashMap;

use nova_core::config::Config;
use nova_core::store::{api_key_key, KeyValueStore};

use crate::registry::PROVIDERS;

/// A secret API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(secret: impl Into<String>) -> Self {
        ApiKey(secret.into())
    }

    /// The raw secret, for building a request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Mapping from provider id to its API key.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<String, ApiKey>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("Credentials").field("providers", &ids).finish()
    }
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping from persisted keys, seeded by config for providers
    /// that have nothing stored.
    pub fn load(store: &dyn KeyValueStore, config: &Config) -> Self {
        let mut credentials = Credentials::new();
        for spec in PROVIDERS {
            let stored = store.get(&api_key_key(spec.id)).filter(|k| !k.is_empty());
            let seeded = config
                .providers
                .get_by_name(spec.id)
                .filter(|p| p.is_configured())
                .map(|p| p.api_key.clone());
            if let Some(secret) = stored.or(seeded) {
                credentials.insert(spec.id, ApiKey::new(secret));
            }
        }
        credentials
    }

    pub fn get(&self, provider_id: &str) -> Option<&ApiKey> {
        self.keys.get(provider_id)
    }

    pub fn insert(&mut self, provider_id: &str, key: ApiKey) {
        self.keys.insert(provider_id.to_string(), key);
    }

    pub fn remove(&mut self, provider_id: &str) -> Option<ApiKey> {
        self.keys.remove(provider_id)
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.keys.contains_key(provider_id)
    }
}

impl<S: Into<String>, K: Into<String>> FromIterator<(S, K)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (S, K)>>(iter: I) -> Self {
        Credentials {
            keys: iter
                .into_iter()
                .map(|(id, secret)| (id.into(), ApiKey::new(secret)))
                .collect(),
        }
    }
}
