//! Output formatting for pathprobe (json, yaml, text)

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use pathprobe_core::{DiagnosticReport, DirectionOutcome, ResolvedGateway};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,
    /// YAML
    Yaml,
    /// Human-readable summary table followed by raw command output
    Text,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print a diagnostic report in the configured format
    pub fn print_report(&self, report: &DiagnosticReport) -> Result<()> {
        match self.format {
            OutputFormat::Json | OutputFormat::Yaml => self.print_structured(report)?,
            OutputFormat::Text => print!("{}", render_report_text(report)),
        }
        Ok(())
    }

    /// Print the gateway selected for `source_ip`
    pub fn print_gateway(&self, source_ip: &str, gateway: Option<&ResolvedGateway>) -> Result<()> {
        match (self.format, gateway) {
            (OutputFormat::Json | OutputFormat::Yaml, _) => self.print_structured(&gateway)?,
            (OutputFormat::Text, Some(gateway)) => {
                println!("{}", Table::new([GatewayRow::from(gateway)]));
            }
            (OutputFormat::Text, None) => {
                println!("No active gateway found for {}", source_ip);
            }
        }
        Ok(())
    }

    fn print_structured<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            _ => serde_json::to_string_pretty(data)?,
        };
        println!("{}", rendered.trim_end());
        Ok(())
    }
}

/// Summary table, then each completed direction's outputs under headings
pub fn render_report_text(report: &DiagnosticReport) -> String {
    let rows: Vec<DirectionRow> = report
        .iter()
        .map(|(direction, outcome)| match outcome {
            DirectionOutcome::Completed(outputs) => DirectionRow {
                direction: direction.to_string(),
                status: "completed".green().to_string(),
                detail: format!("{} command(s)", outputs.len()),
            },
            DirectionOutcome::Failed { error, state } => DirectionRow {
                direction: direction.to_string(),
                status: state.to_string().red().to_string(),
                detail: error.clone(),
            },
        })
        .collect();

    let mut out = format!("{}\n", Table::new(rows));

    for (direction, outcome) in report.iter() {
        let Some(outputs) = outcome.outputs() else {
            continue;
        };
        for (label, output) in outputs {
            out.push('\n');
            out.push_str(&format!("{}\n", format!("[{} {}]", direction, label).bold()));
            out.push_str(output.trim_end());
            out.push('\n');
        }
    }
    out
}

// =============================================================================
// Display types
// =============================================================================

#[derive(Debug, Tabled)]
struct DirectionRow {
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Debug, Tabled)]
struct GatewayRow {
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "Management IP")]
    management_ip: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "HA")]
    high_availability: String,
    #[tabled(rename = "Gateway IP")]
    source_ip: String,
}

impl From<&ResolvedGateway> for GatewayRow {
    fn from(gw: &ResolvedGateway) -> Self {
        Self {
            name: gw.name.clone(),
            management_ip: gw.management_ip.clone(),
            vendor: gw.vendor.to_string(),
            high_availability: if gw.is_high_availability { "yes" } else { "no" }.to_string(),
            source_ip: gw.source_ip.clone(),
        }
    }
}
