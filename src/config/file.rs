//! Loading configuration overrides from TOML.
//!
//! Resolution order:
//! 1. Explicit path (if provided; must exist)
//! 2. `~/.gqlpatch/config.toml` (user)
//! 3. `/etc/gqlpatch/config.toml` (system)
//!
//! With no explicit path and no file at either default location, the
//! overrides are empty and the built-in defaults stay in effect.

use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigOverrides;
use crate::{GqlPatchError, Result};

impl ConfigOverrides {
    /// Load overrides from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse overrides from a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GqlPatchError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GqlPatchError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GqlPatchError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".gqlpatch").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/gqlpatch/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
