//! SSH executor configuration
//!
//! Credentials are kept per vendor: every device of a vendor is reached
//! with the same operator account.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use pathprobe_core::Vendor;
use serde::{Deserialize, Serialize};

/// Username/password pair for device logins
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Device credentials keyed by vendor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorCredentials(HashMap<Vendor, Credentials>);

impl VendorCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, vendor: Vendor, credentials: Credentials) -> Self {
        self.0.insert(vendor, credentials);
        self
    }

    pub fn insert(&mut self, vendor: Vendor, credentials: Credentials) {
        self.0.insert(vendor, credentials);
    }

    pub fn get(&self, vendor: Vendor) -> Option<&Credentials> {
        self.0.get(&vendor)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Connection settings for device sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshConfig {
    /// SSH port on the management address
    #[serde(default = "default_port")]
    pub port: u16,
    /// TCP connect + handshake + authentication budget
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Per-command budget; traceroutes through long paths are slow
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

fn default_port() -> u16 {
    22
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_command_timeout() -> u64 {
    60
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            connect_timeout_secs: default_connect_timeout(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

impl SshConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
