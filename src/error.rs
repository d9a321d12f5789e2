//! gqlpatch error types

/// gqlpatch error types
#[derive(Debug, thiserror::Error)]
pub enum GqlPatchError {
    // Cache errors
    /// The query was never primed in the cache. Absorbed by the patcher.
    #[error("cache miss for query field '{field}'")]
    CacheMiss { field: String },

    #[error("cache error: {0}")]
    Cache(String),

    // Document / data errors
    #[error("invalid query document: {0}")]
    InvalidDocument(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GqlPatchError {
    /// Whether this error means "nothing cached for that query" rather than
    /// a backend failure.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }
}

/// Result type alias for gqlpatch operations
pub type Result<T> = std::result::Result<T, GqlPatchError>;
