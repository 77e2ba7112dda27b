//! Gateway command - show the active gateway selected for an IP

use anyhow::{Context, Result};
use pathprobe_gateway::GatewayResolver;
use pathprobe_inventory::NetBrainClient;
use std::sync::Arc;

use crate::output::OutputContext;

/// Resolve and print the active gateway for `ip`
pub async fn gateway(client: NetBrainClient, ip: &str, ctx: &OutputContext) -> Result<()> {
    let resolver = GatewayResolver::new(Arc::new(client));
    let gateway = resolver
        .resolve(ip)
        .await
        .with_context(|| format!("Failed to resolve gateway for {}", ip))?;

    ctx.print_gateway(ip, gateway.as_ref())
}
