//! In-memory inventory for resolver and orchestrator tests

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pathprobe_core::{
    DeviceAttributes, GatewayRecord, HaState, Inventory, InventoryError, InventoryResult,
};

pub fn device(name: &str, mgmt_ip: &str, vendor: &str, ha: bool) -> DeviceAttributes {
    DeviceAttributes {
        name: name.to_string(),
        management_ip: mgmt_ip.to_string(),
        vendor: vendor.to_string(),
        is_high_availability: ha,
    }
}

#[derive(Default)]
pub struct MockInventory {
    candidates: HashMap<String, Vec<String>>,
    devices: HashMap<String, DeviceAttributes>,
    ha_states: HashMap<String, HaState>,
    delays: HashMap<String, Duration>,
    unreachable: Vec<String>,
    device_lookups: Mutex<Vec<String>>,
    ha_lookups: Mutex<Vec<String>>,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(mut self, source_ip: &str, payloads: &[&str]) -> Self {
        self.candidates.insert(
            source_ip.to_string(),
            payloads.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn with_device(mut self, attrs: DeviceAttributes) -> Self {
        self.devices.insert(attrs.name.clone(), attrs);
        self
    }

    pub fn with_ha_state(mut self, device: &str, state: HaState) -> Self {
        self.ha_states.insert(device.to_string(), state);
        self
    }

    /// Delay the candidate listing for one source IP
    pub fn with_delay(mut self, source_ip: &str, delay: Duration) -> Self {
        self.delays.insert(source_ip.to_string(), delay);
        self
    }

    /// Make the candidate listing for one source IP fail
    pub fn unreachable_for(mut self, source_ip: &str) -> Self {
        self.unreachable.push(source_ip.to_string());
        self
    }

    pub fn device_lookups(&self) -> Vec<String> {
        self.device_lookups.lock().clone()
    }

    pub fn ha_lookups(&self) -> Vec<String> {
        self.ha_lookups.lock().clone()
    }
}

#[async_trait]
impl Inventory for MockInventory {
    async fn list_gateway_candidates(
        &self,
        ip_or_host: &str,
    ) -> InventoryResult<Vec<GatewayRecord>> {
        if let Some(delay) = self.delays.get(ip_or_host) {
            tokio::time::sleep(*delay).await;
        }
        if self.unreachable.iter().any(|ip| ip == ip_or_host) {
            return Err(InventoryError::Transport("connection refused".to_string()));
        }
        self.candidates
            .get(ip_or_host)
            .map(|payloads| {
                payloads
                    .iter()
                    .map(|p| GatewayRecord { payload: p.clone() })
                    .collect()
            })
            .ok_or_else(|| InventoryError::NotFound(format!("no path data for {}", ip_or_host)))
    }

    async fn get_device_attributes(&self, device_name: &str) -> InventoryResult<DeviceAttributes> {
        self.device_lookups.lock().push(device_name.to_string());
        self.devices
            .get(device_name)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("device {}", device_name)))
    }

    async fn get_ha_state(&self, device_name: &str) -> InventoryResult<HaState> {
        self.ha_lookups.lock().push(device_name.to_string());
        Ok(self
            .ha_states
            .get(device_name)
            .copied()
            .unwrap_or(HaState::Unknown))
    }
}
