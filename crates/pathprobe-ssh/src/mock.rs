//! Mock command executor for testing
//!
//! Commands return scripted output (or an echo of the command when nothing
//! is scripted). Failures and connect delays can be injected per host or
//! per command; close failures per host.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use pathprobe_core::{
    CommandExecutor, CommandSession, ConnectionSpec, ExecutionError, ExecutionResult,
};

#[derive(Default)]
struct MockState {
    responses: HashMap<String, String>,
    open_failures: HashMap<String, ExecutionError>,
    command_failures: HashMap<String, ExecutionError>,
    close_failures: HashMap<String, ExecutionError>,
    open_delays: HashMap<String, Duration>,
    executed: Vec<(String, String)>,
    closed: usize,
}

/// Scripted executor; clones share state
#[derive(Clone, Default)]
pub struct MockExecutor {
    state: Arc<RwLock<MockState>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output returned for `command`
    pub fn with_response(self, command: &str, output: &str) -> Self {
        self.state
            .write()
            .responses
            .insert(command.to_string(), output.to_string());
        self
    }

    /// Make opening a session to `host` fail
    pub fn fail_open(self, host: &str, error: ExecutionError) -> Self {
        self.state
            .write()
            .open_failures
            .insert(host.to_string(), error);
        self
    }

    /// Make `command` fail on every host
    pub fn fail_command(self, command: &str, error: ExecutionError) -> Self {
        self.state
            .write()
            .command_failures
            .insert(command.to_string(), error);
        self
    }

    /// Make closing a session to `host` fail
    pub fn fail_close(self, host: &str, error: ExecutionError) -> Self {
        self.state
            .write()
            .close_failures
            .insert(host.to_string(), error);
        self
    }

    /// Delay session setup to `host`
    pub fn with_open_delay(self, host: &str, delay: Duration) -> Self {
        self.state
            .write()
            .open_delays
            .insert(host.to_string(), delay);
        self
    }

    /// `(host, command)` pairs in the order they were executed
    pub fn executed(&self) -> Vec<(String, String)> {
        self.state.read().executed.clone()
    }

    /// Number of sessions closed so far, failed closes included
    pub fn closed(&self) -> usize {
        self.state.read().closed
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn open(&self, spec: &ConnectionSpec) -> ExecutionResult<Box<dyn CommandSession>> {
        let delay = self.state.read().open_delays.get(&spec.host).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.state.read().open_failures.get(&spec.host) {
            return Err(err.clone());
        }

        Ok(Box::new(MockSession {
            host: spec.host.clone(),
            state: self.state.clone(),
        }))
    }
}

struct MockSession {
    host: String,
    state: Arc<RwLock<MockState>>,
}

#[async_trait]
impl CommandSession for MockSession {
    async fn execute(&mut self, command: &str) -> ExecutionResult<String> {
        let mut state = self.state.write();
        state
            .executed
            .push((self.host.clone(), command.to_string()));

        if let Some(err) = state.command_failures.get(command) {
            return Err(err.clone());
        }

        Ok(state
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| format!("{}: ok", command)))
    }

    async fn close(&mut self) -> ExecutionResult<()> {
        let mut state = self.state.write();
        state.closed += 1;
        match state.close_failures.get(&self.host) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
