//! Process-wide configuration handle.
//!
//! Changes apply globally and immediately to every later call that reads
//! the store. There is no scoping and no rollback.

use std::sync::{LazyLock, PoisonError, RwLock};

use tracing::debug;

use super::{ConfigOverrides, PatchConfig};

static GLOBAL: LazyLock<RwLock<PatchConfig>> =
    LazyLock::new(|| RwLock::new(PatchConfig::default()));

/// Merge `overrides` into the process-wide configuration.
pub fn configure(overrides: ConfigOverrides) {
    debug!(?overrides, "merging global patch configuration");
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .merge(overrides);
}

/// Snapshot of the process-wide configuration.
pub fn current_config() -> PatchConfig {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
