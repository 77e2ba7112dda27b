//! SSH command executor built on russh
//!
//! One authenticated connection per device session. Cisco commands each
//! run on their own exec channel of that connection. PAN-OS only offers an
//! interactive CLI, so Palo Alto sessions keep one PTY shell open and type
//! each command into it, reading until the prompt comes back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pathprobe_core::{
    CommandExecutor, CommandSession, ConnectionSpec, ExecutionResult, Vendor,
};
use russh::client::{self, AuthResult};
use russh::keys::ssh_key;
use russh::{Channel, ChannelMsg, Disconnect};
use tracing::{debug, trace, warn};

use crate::config::{SshConfig, VendorCredentials};
use crate::error::SshError;

/// Sent once after the shell opens so long output is never paged
const DISABLE_PAGER: &str = "set cli pager off";

/// Wide enough that typed commands are echoed back on one line
const PTY_COLUMNS: u32 = 511;
const PTY_ROWS: u32 = 24;

/// Only the tail of the output is inspected for the prompt
const PROMPT_WINDOW: usize = 256;

/// Vendors whose CLI refuses exec requests
fn uses_interactive_shell(vendor: Vendor) -> bool {
    matches!(vendor, Vendor::PaloAltoNetworks)
}

/// A CLI prompt line such as `admin@fw-a(active)> ` or `admin@fw-a# `
fn is_prompt(line: &str) -> bool {
    let line = line.trim_end();
    line.contains('@') && (line.ends_with('>') || line.ends_with('#'))
}

/// Whether buffered shell output stops at a prompt waiting for input
fn ends_with_prompt(buffer: &str) -> bool {
    buffer
        .rsplit('\n')
        .next()
        .is_some_and(|last| is_prompt(&last.replace('\r', "")))
}

/// Strip the typed command echo and the trailing prompt from shell output
fn clean_shell_output(raw: &str, command: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = text.lines().collect();

    if let Some(echo) = lines.iter().position(|l| l.trim_end().ends_with(command)) {
        lines.drain(..=echo);
    }
    if lines.last().is_some_and(|l| is_prompt(l)) {
        lines.pop();
    }
    lines.join("\n")
}

// Handler for russh client
#[derive(Clone)]
struct ClientHandler;

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    // Managed devices are reached over the management network only
    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Opens SSH sessions to gateway devices using per-vendor credentials
#[derive(Debug, Clone)]
pub struct SshExecutor {
    config: SshConfig,
    credentials: VendorCredentials,
}

impl SshExecutor {
    pub fn new(config: SshConfig, credentials: VendorCredentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    fn client_config() -> client::Config {
        let mut config = client::Config::default();

        // Legacy algorithms for compatibility with older Cisco devices
        config.preferred.kex = vec![
            russh::kex::CURVE25519,
            russh::kex::DH_G14_SHA256,
            russh::kex::DH_G16_SHA512,
            russh::kex::ECDH_SHA2_NISTP256,
            russh::kex::ECDH_SHA2_NISTP384,
            russh::kex::ECDH_SHA2_NISTP521,
            russh::kex::DH_G14_SHA1,
        ]
        .into();

        config
    }

    async fn connect(&self, spec: &ConnectionSpec) -> Result<SshSession, SshError> {
        let credentials = self
            .credentials
            .get(spec.vendor)
            .ok_or(SshError::MissingCredentials(spec.vendor))?;

        debug!(device = %spec.device, host = %spec.host, port = self.config.port, "Connecting");

        let mut handle = client::connect(
            Arc::new(Self::client_config()),
            (spec.host.as_str(), self.config.port),
            ClientHandler,
        )
        .await
        .map_err(|e| SshError::Connection {
            host: spec.host.clone(),
            reason: e.to_string(),
        })?;

        let auth = handle
            .authenticate_password(&credentials.username, &credentials.password)
            .await
            .map_err(|e| SshError::Connection {
                host: spec.host.clone(),
                reason: e.to_string(),
            })?;

        if !matches!(auth, AuthResult::Success) {
            return Err(SshError::Authentication {
                host: spec.host.clone(),
                username: credentials.username.clone(),
            });
        }

        debug!(device = %spec.device, "Authenticated via password");

        let shell = if uses_interactive_shell(spec.vendor) {
            let shell =
                ShellChannel::open(&handle, &spec.host, self.config.command_timeout()).await?;
            Some(shell)
        } else {
            None
        };

        Ok(SshSession {
            handle,
            host: spec.host.clone(),
            command_timeout: self.config.command_timeout(),
            shell,
        })
    }
}

#[async_trait]
impl CommandExecutor for SshExecutor {
    async fn open(&self, spec: &ConnectionSpec) -> ExecutionResult<Box<dyn CommandSession>> {
        let session = tokio::time::timeout(self.config.connect_timeout(), self.connect(spec))
            .await
            .map_err(|_| SshError::Timeout(format!("connecting to {}", spec.host)))??;
        Ok(Box::new(session))
    }
}

/// Interactive CLI on a PTY, shared by every command of a session
struct ShellChannel {
    channel: Channel<client::Msg>,
    host: String,
    timeout: Duration,
}

impl ShellChannel {
    async fn open(
        handle: &client::Handle<ClientHandler>,
        host: &str,
        timeout: Duration,
    ) -> Result<Self, SshError> {
        let setup_error = |e: russh::Error| SshError::Channel {
            command: "interactive shell".to_string(),
            reason: e.to_string(),
        };

        let channel = handle.channel_open_session().await.map_err(setup_error)?;
        channel
            .request_pty(false, "vt100", PTY_COLUMNS, PTY_ROWS, 0, 0, &[])
            .await
            .map_err(setup_error)?;
        channel.request_shell(true).await.map_err(setup_error)?;

        let mut shell = Self {
            channel,
            host: host.to_string(),
            timeout,
        };

        // Banner and first prompt
        shell.read_until_prompt("interactive shell").await?;
        shell.run(DISABLE_PAGER).await?;

        debug!(host = %shell.host, "Interactive shell ready");
        Ok(shell)
    }

    async fn run(&mut self, command: &str) -> Result<String, SshError> {
        trace!(host = %self.host, "Typing command: {}", command);
        let line = format!("{}\n", command);
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(|e| SshError::Channel {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let raw = self.read_until_prompt(command).await?;
        let output = clean_shell_output(&raw, command);

        debug!(host = %self.host, bytes = output.len(), "Command completed: {}", command);
        Ok(output)
    }

    async fn read_until_prompt(&mut self, context: &str) -> Result<String, SshError> {
        let mut bytes = Vec::new();
        let channel = &mut self.channel;

        let read = tokio::time::timeout(self.timeout, async {
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { data } | ChannelMsg::ExtendedData { data, .. } => {
                        bytes.extend_from_slice(&data);
                        let tail = &bytes[bytes.len().saturating_sub(PROMPT_WINDOW)..];
                        if ends_with_prompt(&String::from_utf8_lossy(tail)) {
                            return Ok(());
                        }
                    }
                    ChannelMsg::Failure => return Err("shell request refused"),
                    ChannelMsg::Eof | ChannelMsg::Close => return Err("shell closed"),
                    other => trace!("Ignoring channel message: {:?}", other),
                }
            }
            Err("shell closed")
        })
        .await;

        match read {
            Ok(Ok(())) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Ok(Err(reason)) => Err(SshError::Channel {
                command: context.to_string(),
                reason: reason.to_string(),
            }),
            Err(_) => {
                warn!(host = %self.host, timeout = ?self.timeout, "No prompt after: {}", context);
                Err(SshError::Timeout(context.to_string()))
            }
        }
    }
}

/// An authenticated SSH connection to one device
pub struct SshSession {
    handle: client::Handle<ClientHandler>,
    host: String,
    command_timeout: Duration,
    /// Set for vendors driven through an interactive CLI
    shell: Option<ShellChannel>,
}

impl SshSession {
    async fn run(&mut self, command: &str) -> Result<String, SshError> {
        match self.shell.as_mut() {
            Some(shell) => shell.run(command).await,
            None => self.exec(command).await,
        }
    }

    async fn exec(&mut self, command: &str) -> Result<String, SshError> {
        trace!(host = %self.host, "Opening channel for command: {}", command);
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| SshError::Channel {
                command: command.to_string(),
                reason: format!("failed to open channel: {}", e),
            })?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| SshError::Channel {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let read = tokio::time::timeout(self.command_timeout, async {
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { data } => stdout.extend_from_slice(&data),
                    ChannelMsg::ExtendedData { data, ext: 1 } => stderr.extend_from_slice(&data),
                    ChannelMsg::ExitStatus { exit_status } => {
                        debug!(exit_status, "Command exited");
                        break;
                    }
                    ChannelMsg::Eof | ChannelMsg::Close => break,
                    other => trace!("Ignoring channel message: {:?}", other),
                }
            }
        })
        .await;

        if read.is_err() {
            warn!(
                host = %self.host,
                timeout = ?self.command_timeout,
                "Command timed out: {}",
                command
            );
            return Err(SshError::Timeout(command.to_string()));
        }

        let output = if stdout.is_empty() && !stderr.is_empty() {
            String::from_utf8_lossy(&stderr).into_owned()
        } else {
            String::from_utf8_lossy(&stdout).into_owned()
        };

        debug!(host = %self.host, bytes = output.len(), "Command completed: {}", command);
        Ok(output)
    }
}

#[async_trait]
impl CommandSession for SshSession {
    async fn execute(&mut self, command: &str) -> ExecutionResult<String> {
        Ok(self.run(command).await?)
    }

    async fn close(&mut self) -> ExecutionResult<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .map_err(|e| SshError::Connection {
                host: self.host.clone(),
                reason: format!("disconnect failed: {}", e),
            })?;
        Ok(())
    }
}
