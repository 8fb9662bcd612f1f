//! In-process cache store backed by a HashMap
//!
//! Expiry is enforced on read: an entry past its deadline is removed the
//! next time it is looked up. There is no background sweeper, so a key
//! that is never read again holds its slot until process exit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{CacheError, CacheNamespace, CacheStore, CacheTtl};

struct Entry {
    value: Value,
    expires_at: Instant,
}

/// Shared in-memory cache; cloning is cheap and clones share storage
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn composite(key: &str, namespace: CacheNamespace) -> String {
        format!("{}:{}", namespace, key)
    }

    /// Number of live (non-expired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(
        &self,
        key: &str,
        namespace: CacheNamespace,
    ) -> Result<Option<Value>, CacheError> {
        let composite = Self::composite(key, namespace);
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&composite) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // expired: drop the entry under the write lock, re-checking the
        // deadline in case a concurrent set refreshed it
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(&composite) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
            entries.remove(&composite);
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: CacheTtl,
        namespace: CacheNamespace,
    ) -> Result<(), CacheError> {
        let composite = Self::composite(key, namespace);
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl.duration(),
        };
        let mut entries = self.entries.write().await;
        entries.insert(composite, entry);
        Ok(())
    }

    async fn exists(&self, key: &str, namespace: CacheNamespace) -> Result<bool, CacheError> {
        Ok(self.get(key, namespace).await?.is_some())
    }
}
