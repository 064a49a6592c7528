//! User configuration management
//!
//! Configuration is stored as JSON at `~/.modman/config.json` (the rest of
//! the Factorio ecosystem — `mod-list.json`, `player-data.json` — is JSON
//! too). Every value can be overridden by a CLI flag; the command layer
//! applies those overrides after loading.
//!
//! # Examples
//!
//! ```no_run
//! use modman::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! if let Some(path) = &config.factorio_path {
//!     println!("Managing mods for {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

use crate::game::AltGlibc;
use crate::portal::DEFAULT_PORTAL_URL;
use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// User configuration file (`~/.modman/config.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the Factorio folder (the one containing `bin/` and `mods/`).
    pub factorio_path: Option<PathBuf>,

    /// Pin the game version instead of probing the binary (`"1.1"`).
    pub factorio_version: Option<String>,

    /// Portal credentials, from `player-data.json`.
    pub username: Option<String>,
    pub token: Option<String>,

    /// Restart the game service when mods changed.
    #[serde(default)]
    pub should_reload: bool,

    /// systemd service running the game; required when `should_reload` is set.
    pub service_name: Option<String>,

    /// Mod portal base URL.
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Accept releases for older game versions when nothing matches exactly.
    #[serde(default)]
    pub should_downgrade: bool,

    #[serde(default = "default_true")]
    pub install_required_dependencies: bool,

    #[serde(default)]
    pub install_optional_dependencies: bool,

    #[serde(default = "default_true")]
    pub remove_required_dependencies: bool,

    #[serde(default)]
    pub remove_optional_dependencies: bool,

    #[serde(default)]
    pub ignore_conflicts_dependencies: bool,

    /// Alternative GLIBC loader, for servers whose system libc is too old.
    pub alternative_glibc_directory: Option<PathBuf>,
    pub alternative_glibc_version: Option<String>,
}

fn default_portal_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            factorio_path: None,
            factorio_version: None,
            username: None,
            token: None,
            should_reload: false,
            service_name: None,
            portal_url: default_portal_url(),
            should_downgrade: false,
            install_required_dependencies: true,
            install_optional_dependencies: false,
            remove_required_dependencies: true,
            remove_optional_dependencies: false,
            ignore_conflicts_dependencies: false,
            alternative_glibc_directory: None,
            alternative_glibc_version: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses MODMAN_CONFIG_DIR if set, otherwise ~/.modman/config.json
    pub fn default_path() -> Result<PathBuf> {
        // Custom config directory, useful for testing.
        if let Ok(config_dir) = std::env::var("MODMAN_CONFIG_DIR") {
            return Ok(PathBuf::from(config_dir).join("config.json"));
        }

        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| Error::Other("Could not find home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".modman").join("config.json"))
    }

    /// Load config from file, or fall back to defaults if it doesn't exist.
    ///
    /// `MODMAN_TOKEN` overrides the configured portal token.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;

        let mut config = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        };

        if let Ok(token) = std::env::var("MODMAN_TOKEN") {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }

        Ok(config)
    }

    /// The mods directory under the configured Factorio path.
    pub fn mods_dir(&self) -> Result<PathBuf> {
        let factorio_path = self.factorio_path.as_ref().ok_or_else(|| {
            Error::Other(
                "Factorio path not set. Set \"factorio_path\" in config.json \
                 or pass --path-to-factorio."
                    .to_string(),
            )
        })?;
        Ok(factorio_path.join("mods"))
    }

    /// The `mod-list.json` path under the mods directory.
    pub fn mod_list_path(&self) -> Result<PathBuf> {
        Ok(self.mods_dir()?.join("mod-list.json"))
    }

    /// Alternative GLIBC loader settings, validated: directory and version
    /// must both be present or both absent.
    pub fn alt_glibc(&self) -> Result<Option<AltGlibc>> {
        match (
            &self.alternative_glibc_directory,
            &self.alternative_glibc_version,
        ) {
            (Some(directory), Some(version)) => Ok(Some(AltGlibc {
                directory: directory.clone(),
                version: version.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(Error::Other(
                "alternative_glibc_directory and alternative_glibc_version \
                 must both be set or both be absent"
                    .to_string(),
            )),
        }
    }
}
