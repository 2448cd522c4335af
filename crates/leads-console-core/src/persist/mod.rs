//! Persistence port for Leads Console.
//!
//! Two layers:
//!
//! - [`KeyValueStore`] is the raw backend: string keys to string values.
//!   Backends report failures as errors (SQLite, in-memory, future browser
//!   storage).
//! - [`PersistenceAdapter`] wraps a backend with JSON encoding and the
//!   best-effort contract the store relies on: saves that fail are logged
//!   and dropped, loads that fail (missing, corrupt, backend error) return
//!   `None`. The in-memory state stays authoritative for the session.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Lead, LeadFilters, Opportunity};

/// The three records the console persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Filters,
    Leads,
    Opportunities,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Filters => "leads-console-filters",
            StorageKey::Leads => "leads-console-leads",
            StorageKey::Opportunities => "leads-console-opportunities",
        }
    }
}

/// Abstract key-value backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](KeyValueStore::get) | Read a value, `None` when absent |
/// | [`set`](KeyValueStore::set) | Insert or overwrite a value |
/// | [`remove`](KeyValueStore::remove) | Delete a value if present |
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Typed, failure-tolerant access to the persisted records.
#[derive(Clone)]
pub struct PersistenceAdapter {
    backend: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load and decode a record. Any failure yields `None`.
    pub async fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.backend.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = key.as_str(), "error loading record: {:#}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = key.as_str(), "ignoring corrupt record: {}", e);
                None
            }
        }
    }

    /// Encode and write a record. Failures are logged, never returned.
    pub async fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = key.as_str(), "error encoding record: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set(key.as_str(), &raw).await {
            tracing::warn!(key = key.as_str(), "error saving record: {:#}", e);
        }
    }

    /// Delete a record. Failures are logged, never returned.
    pub async fn clear(&self, key: StorageKey) {
        if let Err(e) = self.backend.remove(key.as_str()).await {
            tracing::warn!(key = key.as_str(), "error clearing record: {:#}", e);
        }
    }

    pub async fn load_filters(&self) -> Option<LeadFilters> {
        self.load(StorageKey::Filters).await
    }

    pub async fn save_filters(&self, filters: &LeadFilters) {
        self.save(StorageKey::Filters, filters).await
    }

    pub async fn load_leads(&self) -> Option<Vec<Lead>> {
        self.load(StorageKey::Leads).await
    }

    pub async fn save_leads(&self, leads: &[Lead]) {
        self.save(StorageKey::Leads, leads).await
    }

    pub async fn load_opportunities(&self) -> Option<Vec<Opportunity>> {
        self.load(StorageKey::Opportunities).await
    }

    pub async fn save_opportunities(&self, opportunities: &[Opportunity]) {
        self.save(StorageKey::Opportunities, opportunities).await
    }
}
