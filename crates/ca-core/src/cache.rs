//! Cache provider seam and the gateway in front of it
//!
//! The gateway memoizes one value per `(namespace, key)` pair through an
//! injected provider. Without a provider every fetch computes. The gateway
//! knows nothing about staleness: eviction and TTL belong to the provider,
//! the caller's `reload` flag is the only override. Concurrent identical
//! misses may each compute independently; there is no single-flight
//! deduplication.

use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CaError;
use crate::result::CaResult;

/// Entity kind used as the outer cache key component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Project,
    Task,
    Timeslip,
    Invoice,
    Contact,
    User,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
            Self::Timeslip => "timeslip",
            Self::Invoice => "invoice",
            Self::Contact => "contact",
            Self::User => "user",
        }
    }
}

/// Pluggable key/value store behind the gateway.
///
/// Values travel as JSON so a provider can hold them in memory, on disk or
/// anywhere else. Providers supply their own concurrency safety.
pub trait CacheProvider: Send + Sync {
    fn exists(&self, namespace: &str, key: &str) -> bool;
    fn get(&self, namespace: &str, key: &str) -> Option<Value>;
    fn set(&self, namespace: &str, key: &str, value: Value);
}

/// Memoizes resolver results per logical query.
///
/// Keys are scoped with the owning agent's subdomain so two agents sharing a
/// provider never observe each other's entries.
pub struct CacheGateway {
    scope: String,
    provider: Option<Arc<dyn CacheProvider>>,
}

impl CacheGateway {
    pub fn new(scope: impl Into<String>, provider: Option<Arc<dyn CacheProvider>>) -> Self {
        Self {
            scope: scope.into(),
            provider,
        }
    }

    /// Compute-if-absent. With no provider this is a pass-through. A stored
    /// value that no longer deserializes counts as a miss and is recomputed.
    pub fn fetch<T, F>(&self, namespace: Namespace, key: &str, reload: bool, compute: F) -> CaResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> CaResult<T>,
    {
        let Some(provider) = &self.provider else {
            return compute();
        };

        let scoped = self.scoped_key(key);
        if !reload && provider.exists(namespace.as_str(), &scoped) {
            if let Some(stored) = provider.get(namespace.as_str(), &scoped) {
                match serde_json::from_value(stored) {
                    Ok(value) => {
                        debug!(namespace = namespace.as_str(), key = %scoped, "cache hit");
                        return Ok(value);
                    }
                    Err(err) => {
                        warn!(
                            namespace = namespace.as_str(),
                            key = %scoped,
                            %err,
                            "undecodable cache entry, recomputing"
                        );
                    }
                }
            }
        }

        debug!(namespace = namespace.as_str(), key = %scoped, reload, "cache miss");
        let computed = compute()?;
        let value = serde_json::to_value(&computed).map_err(|source| CaError::Cache {
            namespace: namespace.as_str(),
            key: scoped.clone(),
            source,
        })?;
        provider.set(namespace.as_str(), &scoped, value);
        Ok(computed)
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}:{}", self.scope, key)
    }
}

/// DashMap-backed reference provider. No eviction.
#[derive(Default)]
pub struct MemoryCacheProvider {
    entries: DashMap<(String, String), Value>,
}

impl MemoryCacheProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheProvider for MemoryCacheProvider {
    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.entries
            .contains_key(&(namespace.to_string(), key.to_string()))
    }

    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        self.entries
            .get(&(namespace.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
    }

    fn set(&self, namespace: &str, key: &str, value: Value) {
        self.entries
            .insert((namespace.to_string(), key.to_string()), value);
    }
}
