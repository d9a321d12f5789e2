//! The cache collaborator seam.
//!
//! The patcher only ever talks to a GraphQL client's cache through
//! [`QueryCache`]: read the result cached for a query + variables pair,
//! write a new one back. A read for a pair that was never primed returns
//! [`GqlPatchError::CacheMiss`](crate::GqlPatchError::CacheMiss).
//!
//! [`AsyncQueryCache`] is the same contract for caches whose API is
//! asynchronous. Every synchronous cache that is `Send + Sync` gets it for
//! free.
//!
//! [`InMemoryCache`] is a reference implementation (moka-backed) used by the
//! CLI and tests, and usable as a standalone result cache.

pub mod memory;

pub use memory::{CacheConfig, InMemoryCache};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::types::QueryTarget;

/// Read/write access to cached query results.
pub trait QueryCache {
    /// Cached result for `target`, or `CacheMiss` if it was never written.
    fn read_query(&self, target: &QueryTarget) -> Result<Value>;

    /// Store `data` as the result for `target`, replacing any previous one.
    fn write_query(&self, target: &QueryTarget, data: Value) -> Result<()>;
}

impl<C: QueryCache + ?Sized> QueryCache for &C {
    fn read_query(&self, target: &QueryTarget) -> Result<Value> {
        (**self).read_query(target)
    }

    fn write_query(&self, target: &QueryTarget, data: Value) -> Result<()> {
        (**self).write_query(target, data)
    }
}

impl<C: QueryCache + ?Sized> QueryCache for Arc<C> {
    fn read_query(&self, target: &QueryTarget) -> Result<Value> {
        (**self).read_query(target)
    }

    fn write_query(&self, target: &QueryTarget, data: Value) -> Result<()> {
        (**self).write_query(target, data)
    }
}

/// Asynchronous counterpart of [`QueryCache`].
#[async_trait]
pub trait AsyncQueryCache: Send + Sync {
    async fn read_query(&self, target: &QueryTarget) -> Result<Value>;

    async fn write_query(&self, target: &QueryTarget, data: Value) -> Result<()>;
}

#[async_trait]
impl<C: QueryCache + Send + Sync> AsyncQueryCache for C {
    async fn read_query(&self, target: &QueryTarget) -> Result<Value> {
        QueryCache::read_query(self, target)
    }

    async fn write_query(&self, target: &QueryTarget, data: Value) -> Result<()> {
        QueryCache::write_query(self, target, data)
    }
}
