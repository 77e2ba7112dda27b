//! pathprobe - bidirectional path diagnostics from the active gateways
//!
//! Finds the active gateway on each side of a path in NetBrain, then runs
//! ping and traceroute from both gateways concurrently over SSH.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pathprobe_core::{DiagnosticError, Direction};
use pathprobe_inventory::NetBrainClient;
use pathprobe_ssh::SshExecutor;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

/// Exit status after Ctrl+C
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "pathprobe")]
#[command(author, version, about = "Bidirectional active-gateway path diagnostics")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path (TOML, or a legacy env.json)
    #[arg(short, long, env = "PATHPROBE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping and traceroute between two hosts from their active gateways
    Trace {
        /// Source IP address
        #[arg(short, long)]
        source: String,

        /// Destination IP address
        #[arg(short, long)]
        destination: String,

        /// Directions to diagnose
        #[arg(long, value_enum, default_value = "both")]
        direction: DirectionArg,
    },

    /// Show the active gateway selected for an IP
    Gateway {
        /// IP address or hostname
        ip: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Both,
    Forward,
    Reverse,
}

impl DirectionArg {
    fn directions(self) -> Vec<Direction> {
        match self {
            DirectionArg::Both => Direction::BOTH.to_vec(),
            DirectionArg::Forward => vec![Direction::Forward],
            DirectionArg::Reverse => vec![Direction::Reverse],
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = OutputContext::new(cli.output, cli.no_color);
    let started = Instant::now();

    let result = run(&cli, &ctx).await;

    match result {
        Ok(()) => {
            eprintln!(
                "Took {:.3} seconds to complete",
                started.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) if is_cancelled(&e) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            ctx.error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, ctx: &OutputContext) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let client = NetBrainClient::connect(&config.inventory)
        .await
        .context("Failed to log in to NetBrain")?;

    match &cli.command {
        Commands::Trace {
            source,
            destination,
            direction,
        } => {
            let executor = SshExecutor::new(config.ssh.clone(), config.credentials.clone());
            commands::trace(
                client,
                executor,
                source,
                destination,
                &direction.directions(),
                shutdown_signal(),
                ctx,
            )
            .await?;
        }

        Commands::Gateway { ip } => {
            commands::gateway(client, ip, ctx).await?;
        }
    }

    Ok(())
}

/// Completes on Ctrl+C
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: never fire
        std::future::pending::<()>().await;
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DiagnosticError>(),
        Some(DiagnosticError::Cancelled)
    )
}
