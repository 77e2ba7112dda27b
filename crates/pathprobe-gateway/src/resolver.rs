//! Gateway Resolver - selects the active gateway device for a source IP
//!
//! Candidates are evaluated strictly in inventory order and the first one
//! passing every filter wins:
//!
//! 1. candidates without a backing device are skipped
//! 2. the device reference is stripped of its `/vsys` suffix and looked up
//! 3. devices from unsupported vendors are skipped
//! 4. HA devices whose vendor reports an HA state are skipped when it is `passive`
//!
//! An HA state of `unknown` is treated like `active`.

use std::sync::Arc;

use pathprobe_core::device_ref::strip_vsys;
use pathprobe_core::{
    GatewayCandidate, HaState, Inventory, ResolutionError, ResolvedGateway,
};
use tracing::{debug, instrument};

/// Resolves the active gateway for a source IP against an inventory
#[derive(Clone)]
pub struct GatewayResolver {
    inventory: Arc<dyn Inventory>,
}

impl GatewayResolver {
    pub fn new(inventory: Arc<dyn Inventory>) -> Self {
        Self { inventory }
    }

    /// Resolve the active gateway for `source_ip`.
    ///
    /// Returns `Ok(None)` when no candidate qualifies. Inventory failures
    /// and undecodable candidate payloads are errors and are not retried.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        source_ip: &str,
    ) -> Result<Option<ResolvedGateway>, ResolutionError> {
        let records = self
            .inventory
            .list_gateway_candidates(source_ip)
            .await
            .map_err(|e| ResolutionError::inventory(source_ip, e))?;

        debug!(count = records.len(), "Evaluating gateway candidates");

        for (index, record) in records.iter().enumerate() {
            // Decoded lazily: payloads after the winner are never looked at
            let candidate = GatewayCandidate::from_payload(&record.payload).map_err(|e| {
                ResolutionError::MalformedPayload {
                    source_ip: source_ip.to_string(),
                    reason: format!("candidate #{}: {}", index, e),
                }
            })?;

            if let Some(gateway) = self.evaluate(source_ip, &candidate).await? {
                debug!(device = %gateway.name, gateway_ip = %gateway.source_ip, "Selected gateway");
                return Ok(Some(gateway));
            }
        }

        debug!("No eligible gateway candidate");
        Ok(None)
    }

    /// Apply the filters to a single candidate
    async fn evaluate(
        &self,
        source_ip: &str,
        candidate: &GatewayCandidate,
    ) -> Result<Option<ResolvedGateway>, ResolutionError> {
        let Some(device_ref) = candidate.device_ref() else {
            debug!(gateway_ip = %candidate.ip, "Skipping candidate without device");
            return Ok(None);
        };

        let device = strip_vsys(device_ref);
        let attrs = self
            .inventory
            .get_device_attributes(device)
            .await
            .map_err(|e| ResolutionError::inventory(source_ip, e))?;

        let Some(vendor) = attrs.supported_vendor() else {
            debug!(device = %device, vendor = %attrs.vendor, "Skipping unsupported vendor");
            return Ok(None);
        };

        if attrs.is_high_availability && vendor.reports_ha_state() {
            let state = self
                .inventory
                .get_ha_state(&attrs.name)
                .await
                .map_err(|e| ResolutionError::inventory(source_ip, e))?;

            debug!(device = %attrs.name, ha_state = %state, "Fetched HA state");
            if state == HaState::Passive {
                debug!(device = %attrs.name, "Skipping passive HA member");
                return Ok(None);
            }
        }

        Ok(Some(ResolvedGateway::new(attrs, vendor, candidate.ip.clone())))
    }
}
