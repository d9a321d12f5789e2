//! Telemetry metric name constants.
//!
//! Centralised metric names for gqlpatch operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `gqlpatch_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `intent`: resolved intent: "ADD", "REMOVE", "UPDATE" or "AUTO"
//! - `reason`: why a patch was skipped (see [`SkipReason`](crate::SkipReason))
//! - `status`: cache read outcome: "hit" or "miss"

/// Total patches written back to the cache.
///
/// Labels: `intent`.
pub const PATCHES_TOTAL: &str = "gqlpatch_patches_total";

/// Total patch cycles that stopped before writing.
///
/// Labels: `reason`.
pub const PATCHES_SKIPPED_TOTAL: &str = "gqlpatch_patches_skipped_total";

/// Total reads against [`InMemoryCache`](crate::cache::InMemoryCache).
///
/// Labels: `status` ("hit" | "miss").
pub const CACHE_READS_TOTAL: &str = "gqlpatch_cache_reads_total";
