//! In-memory query result cache.
//!
//! Entries are keyed on a content hash of the query source and its
//! variables. Variables are hashed canonically (object keys in sorted
//! order), so `{a: 1, b: 2}` and `{b: 2, a: 1}` address the same entry.
//!
//! Backed by moka's sync cache: bounded, optionally expiring, and safe to
//! share across threads.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::sync::Cache;
use serde_json::Value;

use super::QueryCache;
use crate::telemetry;
use crate::types::QueryTarget;
use crate::{GqlPatchError, Result};

/// Configuration for [`InMemoryCache`].
///
/// ```rust
/// # use gqlpatch::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached query results. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached results. Default: none (entries live until
    /// evicted or overwritten).
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: None,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Expire entries `ttl` after they were written.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Thread-safe in-memory store of query results.
pub struct InMemoryCache {
    entries: Cache<u64, Value>,
}

impl InMemoryCache {
    /// Create an empty cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_entries);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            entries: builder.build(),
        }
    }

    /// Whether a result is cached for `target`.
    pub fn contains(&self, target: &QueryTarget) -> bool {
        self.entries.contains_key(&cache_key(target))
    }

    /// Drop the result cached for `target`, if any.
    pub fn invalidate(&self, target: &QueryTarget) {
        self.entries.invalidate(&cache_key(target));
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache for InMemoryCache {
    fn read_query(&self, target: &QueryTarget) -> Result<Value> {
        match self.entries.get(&cache_key(target)) {
            Some(data) => {
                metrics::counter!(telemetry::CACHE_READS_TOTAL, "status" => "hit").increment(1);
                Ok(data)
            }
            None => {
                metrics::counter!(telemetry::CACHE_READS_TOTAL, "status" => "miss").increment(1);
                Err(GqlPatchError::CacheMiss {
                    field: target.root_field().to_string(),
                })
            }
        }
    }

    fn write_query(&self, target: &QueryTarget, data: Value) -> Result<()> {
        self.entries.insert(cache_key(target), data);
        Ok(())
    }
}

/// Compute a cache key from the query source and canonical variables.
///
/// Uses `DefaultHasher` (SipHash); deterministic within a process lifetime,
/// which is all an in-memory cache needs.
fn cache_key(target: &QueryTarget) -> u64 {
    let mut hasher = DefaultHasher::new();
    target.document.source().hash(&mut hasher);
    target.variables.len().hash(&mut hasher);
    let mut names: Vec<&String> = target.variables.keys().collect();
    names.sort();
    for name in names {
        name.hash(&mut hasher);
        hash_json(&target.variables[name.as_str()], &mut hasher);
    }
    hasher.finish()
}

fn hash_json<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_json(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, nested) in entries {
                key.hash(state);
                hash_json(nested, state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryDocument;
    use serde_json::json;

    fn posts_query() -> QueryDocument {
        QueryDocument::with_root_field("query Posts { posts { id } }", "posts")
    }

    #[test]
    fn cache_key_deterministic() {
        let target = QueryTarget::new(posts_query()).variable("first", 10);
        assert_eq!(cache_key(&target), cache_key(&target.clone()));
    }

    #[test]
    fn cache_key_ignores_variable_order() {
        let a = QueryTarget::new(posts_query())
            .variable("first", 10)
            .variable("filter", json!({"draft": false, "tag": "rust"}));
        let b = QueryTarget::new(posts_query())
            .variable("filter", json!({"tag": "rust", "draft": false}))
            .variable("first", 10);
        assert_eq!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn cache_key_differs_on_variables() {
        let a = QueryTarget::new(posts_query()).variable("first", 10);
        let b = QueryTarget::new(posts_query()).variable("first", 20);
        let c = QueryTarget::new(posts_query()).variable("first", "10");
        assert_ne!(cache_key(&a), cache_key(&b));
        assert_ne!(cache_key(&a), cache_key(&c));
    }

    #[test]
    fn cache_key_differs_on_document() {
        let a = QueryTarget::new(posts_query());
        let b = QueryTarget::new(QueryDocument::with_root_field("{ posts { id title } }", "posts"));
        assert_ne!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn miss_reports_root_field() {
        let cache = InMemoryCache::new();
        let err = cache.read_query(&QueryTarget::new(posts_query())).unwrap_err();
        assert!(err.is_cache_miss());
        assert!(err.to_string().contains("posts"));
    }
}
