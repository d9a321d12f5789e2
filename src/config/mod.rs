//! Patch configuration.
//!
//! [`PatchConfig`] holds the identity field name, the three name-prefix
//! lists that drive intent classification, and an optional callback that
//! picks the identity field per item. It is a plain value: pass it to a
//! [`CachePatcher`](crate::CachePatcher) directly, or use the process-wide
//! store ([`configure`], [`current_config`]) that the global entry points
//! read from.
//!
//! Overrides are partial. [`PatchConfig::merge`] replaces only the keys an
//! override sets, so repeated merges are last-write-wins per key.
//!
//! ```rust
//! # use gqlpatch::{ConfigOverrides, PatchConfig};
//! let config = PatchConfig::default().with_overrides(
//!     ConfigOverrides::new()
//!         .identity_field("uuid")
//!         .add_prefixes(["create", "publish"]),
//! );
//! assert_eq!(config.identity_field, "uuid");
//! ```

mod file;
mod store;

pub use store::{configure, current_config};

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::types::Intent;

/// Identity field used when nothing else is configured.
pub const DEFAULT_IDENTITY_FIELD: &str = "id";

/// Type discriminator field; never merged into single cached items.
pub const TYPENAME_FIELD: &str = "__typename";

/// Default prefixes classified as [`Intent::Add`].
pub const DEFAULT_ADD_PREFIXES: &[&str] = &["create", "add", "new", "insert"];

/// Default prefixes classified as [`Intent::Remove`].
pub const DEFAULT_REMOVE_PREFIXES: &[&str] = &["remove", "delete"];

/// Default prefixes classified as [`Intent::Update`].
pub const DEFAULT_UPDATE_PREFIXES: &[&str] = &["update", "edit"];

/// Picks the identity field for an item, e.g. from its `__typename`.
///
/// Returning `None` falls back to the configured default.
pub type IdentityResolver = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Resolved configuration read by classification and identity resolution.
#[derive(Clone)]
pub struct PatchConfig {
    /// Default identity field. Default: `"id"`.
    pub identity_field: String,
    /// Lower-case prefixes marking an ADD operation.
    pub add_prefixes: Vec<String>,
    /// Lower-case prefixes marking a REMOVE operation.
    pub remove_prefixes: Vec<String>,
    /// Lower-case prefixes marking an UPDATE operation.
    pub update_prefixes: Vec<String>,
    /// Per-item identity field callback.
    pub identity_resolver: Option<IdentityResolver>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            add_prefixes: owned(DEFAULT_ADD_PREFIXES),
            remove_prefixes: owned(DEFAULT_REMOVE_PREFIXES),
            update_prefixes: owned(DEFAULT_UPDATE_PREFIXES),
            identity_resolver: None,
        }
    }
}

impl PatchConfig {
    /// Built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `overrides` into this config. Unset override keys are left alone.
    pub fn merge(&mut self, overrides: ConfigOverrides) {
        if let Some(field) = overrides.identity_field {
            self.identity_field = field;
        }
        if let Some(prefixes) = overrides.add_prefixes {
            self.add_prefixes = lowercase(prefixes);
        }
        if let Some(prefixes) = overrides.remove_prefixes {
            self.remove_prefixes = lowercase(prefixes);
        }
        if let Some(prefixes) = overrides.update_prefixes {
            self.update_prefixes = lowercase(prefixes);
        }
        if let Some(resolver) = overrides.identity_resolver {
            self.identity_resolver = Some(resolver);
        }
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.merge(overrides);
        self
    }

    /// Prefix list for a concrete intent; `Auto` has none.
    pub fn prefixes(&self, intent: Intent) -> &[String] {
        match intent {
            Intent::Add => &self.add_prefixes,
            Intent::Remove => &self.remove_prefixes,
            Intent::Update => &self.update_prefixes,
            Intent::Auto => &[],
        }
    }

    /// Identity field for `item`: the resolver's answer if it gives one,
    /// otherwise the configured default.
    pub fn identity_field_for(&self, item: &Value) -> String {
        self.identity_resolver
            .as_ref()
            .and_then(|resolve| resolve(item))
            .unwrap_or_else(|| self.identity_field.clone())
    }
}

impl fmt::Debug for PatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchConfig")
            .field("identity_field", &self.identity_field)
            .field("add_prefixes", &self.add_prefixes)
            .field("remove_prefixes", &self.remove_prefixes)
            .field("update_prefixes", &self.update_prefixes)
            .field("identity_resolver", &self.identity_resolver.is_some())
            .finish()
    }
}

/// Partial configuration, merged over a [`PatchConfig`].
///
/// Deserializable from TOML (see [`ConfigOverrides::load`]); the resolver
/// callback can only be set programmatically.
///
/// ```toml
/// identity_field = "uuid"
/// add_prefixes = ["create", "publish"]
/// remove_prefixes = ["delete", "archive"]
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub identity_field: Option<String>,
    pub add_prefixes: Option<Vec<String>>,
    pub remove_prefixes: Option<Vec<String>>,
    pub update_prefixes: Option<Vec<String>>,
    #[serde(skip)]
    pub identity_resolver: Option<IdentityResolver>,
}

impl ConfigOverrides {
    /// Empty overrides (merging them changes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = Some(field.into());
        self
    }

    pub fn add_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn remove_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remove_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn update_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn identity_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.identity_resolver = Some(Arc::new(resolver));
        self
    }
}

impl fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("identity_field", &self.identity_field)
            .field("add_prefixes", &self.add_prefixes)
            .field("remove_prefixes", &self.remove_prefixes)
            .field("update_prefixes", &self.update_prefixes)
            .field("identity_resolver", &self.identity_resolver.is_some())
            .finish()
    }
}

fn owned(prefixes: &[&str]) -> Vec<String> {
    prefixes.iter().map(|p| (*p).to_string()).collect()
}

fn lowercase(prefixes: Vec<String>) -> Vec<String> {
    prefixes.into_iter().map(|p| p.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = PatchConfig::default();
        assert_eq!(config.identity_field, "id");
        assert_eq!(config.add_prefixes, ["create", "add", "new", "insert"]);
        assert_eq!(config.remove_prefixes, ["remove", "delete"]);
        assert_eq!(config.update_prefixes, ["update", "edit"]);
        assert!(config.identity_resolver.is_none());
    }

    #[test]
    fn merge_only_touches_set_keys() {
        let mut config = PatchConfig::default();
        config.merge(ConfigOverrides::new().remove_prefixes(["Archive"]));

        assert_eq!(config.identity_field, "id");
        assert_eq!(config.add_prefixes, ["create", "add", "new", "insert"]);
        assert_eq!(config.remove_prefixes, ["archive"]);
    }

    #[test]
    fn later_merge_wins_per_key() {
        let config = PatchConfig::default()
            .with_overrides(ConfigOverrides::new().identity_field("uuid").add_prefixes(["make"]))
            .with_overrides(ConfigOverrides::new().identity_field("key"));

        assert_eq!(config.identity_field, "key");
        assert_eq!(config.add_prefixes, ["make"]);
    }

    #[test]
    fn resolver_falls_back_to_default_field() {
        let config = PatchConfig::default().with_overrides(ConfigOverrides::new().identity_resolver(
            |item| match item.get(TYPENAME_FIELD).and_then(Value::as_str) {
                Some("User") => Some("username".to_string()),
                _ => None,
            },
        ));

        assert_eq!(
            config.identity_field_for(&json!({"__typename": "User", "username": "ana"})),
            "username"
        );
        assert_eq!(config.identity_field_for(&json!({"__typename": "Post", "id": 1})), "id");
    }

    #[test]
    fn prefixes_by_intent() {
        let config = PatchConfig::default();
        assert_eq!(config.prefixes(Intent::Update), ["update", "edit"]);
        assert!(config.prefixes(Intent::Auto).is_empty());
    }

    #[test]
    fn overrides_parse_from_toml() {
        let overrides: ConfigOverrides = toml::from_str(
            r#"
            identity_field = "uuid"
            update_prefixes = ["patch", "Rename"]
        "#,
        )
        .unwrap();
        let config = PatchConfig::default().with_overrides(overrides);
        assert_eq!(config.identity_field, "uuid");
        assert_eq!(config.update_prefixes, ["patch", "rename"]);
        assert_eq!(config.remove_prefixes, ["remove", "delete"]);
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let result: std::result::Result<ConfigOverrides, _> = toml::from_str("idfield = \"x\"");
        assert!(result.is_err());
    }
}
