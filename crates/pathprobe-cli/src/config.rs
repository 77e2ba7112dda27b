//! Configuration file handling for pathprobe
//!
//! TOML is the native format. A `.json` file is read with the flat
//! `env.json` layout older deployments already have.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pathprobe_core::Vendor;
use pathprobe_inventory::InventoryConfig;
use pathprobe_ssh::{Credentials, SshConfig, VendorCredentials};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Replaces the inventory password from the file when set
pub const PASSWORD_ENV: &str = "PATHPROBE_INVENTORY_PASSWORD";

/// Legacy file looked up in the working directory
const LEGACY_FILE: &str = "env.json";

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub credentials: VendorCredentials,
}

/// Flat `env.json` layout
#[derive(Deserialize)]
struct LegacyConfig {
    netbrain_url: String,
    netbrain_user: String,
    netbrain_password: String,
    tenant_name: String,
    domain_name: String,
    /// Keyed by inventory vendor name ("Cisco", "Palo Alto Networks")
    #[serde(default)]
    credentials: HashMap<String, Credentials>,
}

impl Config {
    /// Load from `path`, or from the first default location that exists,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::discover()?,
        };

        let mut config = Self::load_from(&path)?;
        config.override_password(std::env::var(PASSWORD_ENV).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_legacy_json(&content)
        } else {
            toml::from_str(&content).map_err(anyhow::Error::from)
        };
        parsed.with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse the flat `env.json` layout
    pub fn from_legacy_json(content: &str) -> Result<Self> {
        let legacy: LegacyConfig = serde_json::from_str(content)?;

        let mut credentials = VendorCredentials::new();
        for (name, creds) in legacy.credentials {
            match Vendor::from_inventory_name(&name) {
                Some(vendor) => credentials.insert(vendor, creds),
                None => warn!(vendor = %name, "Ignoring credentials for unsupported vendor"),
            }
        }

        Ok(Self {
            inventory: InventoryConfig::new(
                legacy.netbrain_url,
                legacy.netbrain_user,
                legacy.netbrain_password,
                legacy.tenant_name,
                legacy.domain_name,
            ),
            ssh: SshConfig::default(),
            credentials,
        })
    }

    pub fn override_password(&mut self, password: Option<String>) {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.inventory.password = password;
        }
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pathprobe").join("config.toml"))
    }

    /// Locations tried when no path is given, in order
    pub fn search_paths() -> Vec<PathBuf> {
        Self::config_path()
            .into_iter()
            .chain(std::iter::once(PathBuf::from(LEGACY_FILE)))
            .collect()
    }

    fn discover() -> Result<PathBuf> {
        let candidates = Self::search_paths();
        if let Some(found) = candidates.iter().find(|p| p.exists()) {
            return Ok(found.clone());
        }

        let searched: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        bail!(
            "No configuration file found (searched: {}); pass --config",
            searched.join(", ")
        )
    }
}
