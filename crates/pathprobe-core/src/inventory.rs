//! Inventory trait - the query surface gateway resolution runs against

use async_trait::async_trait;

use crate::error::InventoryResult;
use crate::models::{DeviceAttributes, GatewayRecord, HaState};

/// An authenticated inventory (CMDB) session.
///
/// Implementations are shared read-only between concurrent direction
/// tasks, so session state must be established before the first call.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Gateway records for a source IP or host, in inventory order
    async fn list_gateway_candidates(
        &self,
        ip_or_host: &str,
    ) -> InventoryResult<Vec<GatewayRecord>>;

    /// Attributes of a device by its (vsys-stripped) name
    async fn get_device_attributes(&self, device_name: &str) -> InventoryResult<DeviceAttributes>;

    /// HA state of a device.
    ///
    /// Only meaningful for HA-capable devices; the default reports
    /// `Unknown` for inventories without an HA-state table.
    async fn get_ha_state(&self, device_name: &str) -> InventoryResult<HaState> {
        let _ = device_name;
        Ok(HaState::Unknown)
    }
}
