//! Supported gateway vendors and their diagnostic command templates

use std::fmt;

use serde::{Deserialize, Serialize};

/// A vendor whose devices can act as a resolved gateway.
///
/// Inventory vendor strings outside this set are unsupported and never
/// produce a `Vendor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Cisco,
    PaloAltoNetworks,
}

/// One diagnostic command to run on a gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticCommand {
    /// Report label (`ping_src`, `ping_dst`, `traceroute`)
    pub label: &'static str,
    /// Command text sent to the device
    pub command: String,
}

impl Vendor {
    /// Every supported vendor
    pub const ALL: [Vendor; 2] = [Vendor::Cisco, Vendor::PaloAltoNetworks];

    /// Map an inventory vendor string to a supported vendor
    pub fn from_inventory_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.inventory_name() == name)
    }

    /// Vendor name as reported by the inventory
    pub fn inventory_name(self) -> &'static str {
        match self {
            Vendor::Cisco => "Cisco",
            Vendor::PaloAltoNetworks => "Palo Alto Networks",
        }
    }

    /// Whether the inventory reports an HA state for this vendor
    pub fn reports_ha_state(self) -> bool {
        matches!(self, Vendor::PaloAltoNetworks)
    }

    /// Ping `dst` from the gateway interface `gateway_source`
    pub fn ping_command(self, gateway_source: &str, dst: &str) -> String {
        match self {
            Vendor::Cisco => format!("ping {} source {}", dst, gateway_source),
            Vendor::PaloAltoNetworks => {
                format!("ping count 4 source {} host {}", gateway_source, dst)
            }
        }
    }

    /// Traceroute to `dst` from the gateway interface `gateway_source`
    pub fn traceroute_command(self, gateway_source: &str, dst: &str) -> String {
        match self {
            Vendor::Cisco => format!("traceroute {} source {}", dst, gateway_source),
            Vendor::PaloAltoNetworks => {
                format!("traceroute source {} host {}", gateway_source, dst)
            }
        }
    }

    /// Full command set for one direction, in execution order
    pub fn commands(self, gateway_source: &str, src: &str, dst: &str) -> Vec<DiagnosticCommand> {
        vec![
            DiagnosticCommand {
                label: "ping_src",
                command: self.ping_command(gateway_source, src),
            },
            DiagnosticCommand {
                label: "ping_dst",
                command: self.ping_command(gateway_source, dst),
            },
            DiagnosticCommand {
                label: "traceroute",
                command: self.traceroute_command(gateway_source, dst),
            },
        ]
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inventory_name())
    }
}
