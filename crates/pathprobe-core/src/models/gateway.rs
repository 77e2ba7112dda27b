//! Inventory records and the resolved gateway

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vendor::Vendor;

/// Raw gateway entry as listed by the inventory.
///
/// The interesting data lives in `payload`, a JSON document encoded as a
/// string. It is decoded with [`GatewayCandidate::from_payload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRecord {
    pub payload: String,
}

/// One candidate gateway for a source IP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCandidate {
    /// Address of the candidate gateway interface
    pub ip: String,
    /// Backing device, possibly with a `/vsys` suffix
    #[serde(rename = "device", default, skip_serializing_if = "Option::is_none")]
    pub device_ref: Option<String>,
}

impl GatewayCandidate {
    /// Decode a candidate from an inventory payload string
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Device reference, if the candidate is backed by a managed device.
    ///
    /// An empty reference counts as absent.
    pub fn device_ref(&self) -> Option<&str> {
        self.device_ref.as_deref().filter(|d| !d.is_empty())
    }
}

/// Attributes of a managed device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    pub name: String,
    #[serde(rename = "mgmtIP")]
    pub management_ip: String,
    /// Vendor string as reported by the inventory
    pub vendor: String,
    #[serde(rename = "isHA", default)]
    pub is_high_availability: bool,
}

impl DeviceAttributes {
    /// The vendor, if it is one we can drive
    pub fn supported_vendor(&self) -> Option<Vendor> {
        Vendor::from_inventory_name(&self.vendor)
    }
}

/// High-availability state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HaState {
    Active,
    Passive,
    Unknown,
}

impl fmt::Display for HaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HaState::Active => "active",
            HaState::Passive => "passive",
            HaState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The active gateway selected for a source IP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGateway {
    pub name: String,
    #[serde(rename = "mgmtIP")]
    pub management_ip: String,
    pub vendor: Vendor,
    #[serde(rename = "isHA")]
    pub is_high_availability: bool,
    /// Gateway interface address facing the source subnet
    #[serde(rename = "srcIP")]
    pub source_ip: String,
}

impl ResolvedGateway {
    pub fn new(attrs: DeviceAttributes, vendor: Vendor, source_ip: impl Into<String>) -> Self {
        Self {
            name: attrs.name,
            management_ip: attrs.management_ip,
            vendor,
            is_high_availability: attrs.is_high_availability,
            source_ip: source_ip.into(),
        }
    }
}
