//! gqlpatch - automatic cache updates for GraphQL mutation and subscription results
//!
//! Given the result of a mutation or subscription, gqlpatch patches a
//! previously cached query result so observers see the change without
//! hand-written merge code. It infers what the operation did from its name
//! (`createPost` adds, `deletePost` removes, `updatePost` updates), finds
//! the collection inside the cached result, and applies a structural patch
//! matched on an identity field.
//!
//! The GraphQL client's cache stays external: anything implementing
//! [`QueryCache`] (read and write by query + variables) can be patched.
//!
//! # Example
//!
//! ```rust
//! use gqlpatch::{InMemoryCache, QueryCache, QueryDocument, UpdateRecipe, apply_patch};
//! use serde_json::json;
//!
//! # fn main() -> gqlpatch::Result<()> {
//! let cache = InMemoryCache::new();
//! let posts = QueryDocument::parse("query Posts { posts { id title } }")?;
//! let recipe = UpdateRecipe::new(posts);
//!
//! cache.write_query(&recipe.target, json!({"posts": [{"id": 1, "title": "first"}]}))?;
//!
//! apply_patch(&cache, &json!({"createPost": {"id": 2, "title": "second"}}), &recipe)?;
//!
//! assert_eq!(
//!     cache.read_query(&recipe.target)?,
//!     json!({"posts": [{"id": 1, "title": "first"}, {"id": 2, "title": "second"}]})
//! );
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod hooks;
pub mod patch;
pub mod path;
pub mod strategy;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{AsyncQueryCache, CacheConfig, InMemoryCache, QueryCache};
pub use classify::classify;
pub use config::{
    ConfigOverrides, IdentityResolver, PatchConfig, configure, current_config,
};
pub use error::{GqlPatchError, Result};
pub use hooks::{CompletionCallback, HookOptions, with_cache_update};
pub use patch::{CachePatcher, PatchOutcome, SkipReason, apply_patch, apply_patch_async};
pub use strategy::{Shape, UpdateStrategy};
pub use types::{
    ArrayLocation, Intent, ItemMapper, PathSegment, QueryDocument, QueryTarget, UpdateRecipe,
    ValuePath, Variables,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
