//! NetBrain connection settings

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how to log in to NetBrain
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryConfig {
    /// Base URL of the NetBrain server, without the API prefix
    pub url: String,
    pub username: String,
    pub password: String,
    /// Tenant name selected after login
    pub tenant: String,
    /// Domain name selected within the tenant
    pub domain: String,
    /// Verify the server certificate (off by default)
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl InventoryConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        tenant: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            tenant: tenant.into(),
            domain: domain.into(),
            verify_tls: false,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl fmt::Debug for InventoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant", &self.tenant)
            .field("domain", &self.domain)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
