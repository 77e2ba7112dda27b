//! Trace command - bidirectional path diagnostics

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use pathprobe_core::Direction;
use pathprobe_gateway::DiagnosticOrchestrator;
use pathprobe_inventory::NetBrainClient;
use pathprobe_ssh::SshExecutor;

use crate::output::OutputContext;

/// Run diagnostics for `directions` and print the report.
///
/// Partial failures are printed with the report and warned about on
/// stderr; an all-failed run or a shutdown is returned as the error.
pub async fn trace<F>(
    client: NetBrainClient,
    executor: SshExecutor,
    source: &str,
    destination: &str,
    directions: &[Direction],
    shutdown: F,
    ctx: &OutputContext,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let orchestrator = DiagnosticOrchestrator::new(Arc::new(client), Arc::new(executor));
    let report = orchestrator
        .run_until(source, destination, directions, shutdown)
        .await?;

    ctx.print_report(&report)?;

    if report.is_partial() {
        let failed: Vec<String> = report.failed().iter().map(|d| d.to_string()).collect();
        ctx.warn(&format!("Diagnostics failed for: {}", failed.join(", ")));
    }
    Ok(())
}
