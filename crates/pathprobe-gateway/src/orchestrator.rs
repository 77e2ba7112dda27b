//! Diagnostic Orchestrator - concurrent forward/reverse path diagnostics
//!
//! Each requested direction runs as its own task: resolve the active
//! gateway for the direction's source, then run the vendor command set on
//! that gateway. Tasks report into a shared [`ReportCollector`]; the
//! orchestrator waits for every task before handing the report back.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use pathprobe_core::{
    AggregateError, CommandExecutor, CommandOutputs, CommandSession, ConnectionSpec,
    DiagnosticError, DiagnosticReport, Direction, DirectionFailure, DirectionOutcome,
    ExecutionResult, Inventory, ResolvedGateway, TaskState,
};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::resolver::GatewayResolver;

/// Collects direction outcomes from concurrent tasks.
///
/// Inserts are serialized by a mutex; the report is only handed out once
/// all writers are done.
#[derive(Clone, Default)]
pub struct ReportCollector {
    inner: Arc<Mutex<DiagnosticReport>>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, direction: Direction, outcome: DirectionOutcome) {
        self.inner.lock().insert(direction, outcome);
    }

    fn contains(&self, direction: Direction) -> bool {
        self.inner.lock().get(direction).is_some()
    }

    pub fn into_report(self) -> DiagnosticReport {
        match Arc::try_unwrap(self.inner) {
            Ok(report) => report.into_inner(),
            Err(shared) => shared.lock().clone(),
        }
    }
}

/// Runs gateway resolution and device diagnostics for one or more directions
pub struct DiagnosticOrchestrator {
    inventory: Arc<dyn Inventory>,
    executor: Arc<dyn CommandExecutor>,
}

impl DiagnosticOrchestrator {
    pub fn new(inventory: Arc<dyn Inventory>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            inventory,
            executor,
        }
    }

    /// A resolver over the same inventory
    pub fn resolver(&self) -> GatewayResolver {
        GatewayResolver::new(self.inventory.clone())
    }

    /// Run diagnostics for the requested directions and wait for all of them.
    ///
    /// Fails with [`DiagnosticError::Aggregate`] only when every direction
    /// failed; partial failures are failure markers inside the report.
    pub async fn run(
        &self,
        source: &str,
        destination: &str,
        directions: &[Direction],
    ) -> Result<DiagnosticReport, DiagnosticError> {
        self.run_until(source, destination, directions, std::future::pending())
            .await
    }

    /// Like [`run`](Self::run), but abandons all in-flight tasks and returns
    /// [`DiagnosticError::Cancelled`] once `shutdown` completes.
    pub async fn run_until<F>(
        &self,
        source: &str,
        destination: &str,
        directions: &[Direction],
        shutdown: F,
    ) -> Result<DiagnosticReport, DiagnosticError>
    where
        F: Future<Output = ()>,
    {
        let mut requested: Vec<Direction> = Vec::with_capacity(directions.len());
        for direction in directions {
            if !requested.contains(direction) {
                requested.push(*direction);
            }
        }
        if requested.is_empty() {
            return Err(DiagnosticError::NoDirections);
        }

        let collector = ReportCollector::new();
        let mut tasks = JoinSet::new();

        for direction in &requested {
            let (src, dst) = direction.endpoints(source, destination);
            let task = DirectionTask {
                direction: *direction,
                src: src.to_string(),
                dst: dst.to_string(),
                resolver: self.resolver(),
                executor: self.executor.clone(),
                collector: collector.clone(),
            };
            debug!(direction = %direction, src = %src, dst = %dst, "Spawning direction task");
            tasks.spawn(task.run());
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok(())) => {}
                    Some(Err(e)) => warn!(error = %e, "Direction task did not finish"),
                    None => break,
                },
                () = &mut shutdown => {
                    info!("Shutdown requested, abandoning diagnostic tasks");
                    tasks.abort_all();
                    return Err(DiagnosticError::Cancelled);
                }
            }
        }

        // A task that panicked never recorded its outcome
        for direction in &requested {
            if !collector.contains(*direction) {
                collector.record(
                    *direction,
                    DirectionOutcome::Failed {
                        error: "Direction task terminated unexpectedly".to_string(),
                        state: TaskState::ExecutionFailed,
                    },
                );
            }
        }

        let report = collector.into_report();
        if report.succeeded().is_empty() {
            let failures = report
                .iter()
                .map(|(d, o)| (d, o.error().unwrap_or_default().to_string()))
                .collect();
            return Err(AggregateError { failures }.into());
        }

        if report.is_partial() {
            warn!(failed = ?report.failed(), "Diagnostics partially failed");
        }
        Ok(report)
    }
}

/// One direction: resolve, then execute
struct DirectionTask {
    direction: Direction,
    src: String,
    dst: String,
    resolver: GatewayResolver,
    executor: Arc<dyn CommandExecutor>,
    collector: ReportCollector,
}

impl DirectionTask {
    async fn run(self) {
        let mut state = TaskState::Pending;
        let outcome = match self.drive(&mut state).await {
            Ok(outputs) => DirectionOutcome::Completed(outputs),
            Err(failure) => {
                warn!(
                    direction = %self.direction,
                    state = %state,
                    error = %failure,
                    "Direction failed"
                );
                DirectionOutcome::Failed {
                    error: failure.to_string(),
                    state,
                }
            }
        };
        self.collector.record(self.direction, outcome);
    }

    fn transition(&self, state: &mut TaskState, next: TaskState) {
        debug!(direction = %self.direction, from = %state, to = %next, "Task state change");
        *state = next;
    }

    async fn drive(&self, state: &mut TaskState) -> Result<CommandOutputs, DirectionFailure> {
        self.transition(state, TaskState::Resolving);
        let gateway = match self.resolver.resolve(&self.src).await {
            Ok(Some(gateway)) => gateway,
            Ok(None) => {
                self.transition(state, TaskState::ResolutionFailed);
                return Err(DirectionFailure::GatewayNotFound(self.src.clone()));
            }
            Err(e) => {
                self.transition(state, TaskState::ResolutionFailed);
                return Err(e.into());
            }
        };
        self.transition(state, TaskState::Resolved);
        info!(
            direction = %self.direction,
            device = %gateway.name,
            mgmt_ip = %gateway.management_ip,
            vendor = %gateway.vendor,
            gateway_ip = %gateway.source_ip,
            "Resolved active gateway"
        );

        self.transition(state, TaskState::Executing);
        match self.execute(&gateway).await {
            Ok(outputs) => {
                self.transition(state, TaskState::Completed);
                Ok(outputs)
            }
            Err(e) => {
                self.transition(state, TaskState::ExecutionFailed);
                Err(e.into())
            }
        }
    }

    async fn execute(&self, gateway: &ResolvedGateway) -> ExecutionResult<CommandOutputs> {
        let spec = ConnectionSpec::from(gateway);
        let mut session = self.executor.open(&spec).await?;

        // A close failure never replaces the command result
        let result = self.run_commands(session.as_mut(), gateway).await;
        if let Err(e) = session.close().await {
            warn!(device = %spec.device, error = %e, "Failed to close device session");
        }
        result
    }

    async fn run_commands(
        &self,
        session: &mut dyn CommandSession,
        gateway: &ResolvedGateway,
    ) -> ExecutionResult<CommandOutputs> {
        let mut outputs = CommandOutputs::new();
        for cmd in gateway
            .vendor
            .commands(&gateway.source_ip, &self.src, &self.dst)
        {
            debug!(direction = %self.direction, command = %cmd.command, "Running command");
            let output = session.execute(&cmd.command).await?;
            outputs.insert(cmd.label.to_string(), output);
        }
        Ok(outputs)
    }
}
