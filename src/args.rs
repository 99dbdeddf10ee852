//! These structs provide the CLI interface for the solar-waste CLI.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// solar-waste: Dashboards of projected solar panel waste in Australia.
///
/// The program reads two CSV tables: a national projection broken down by region and system
/// type, and a per-state breakdown. From these it serves an interactive line chart with filters,
/// serves a stacked bar and cumulative line combo chart, or writes the combo chart to a
/// standalone HTML file.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the filtered waste dashboard.
    ///
    /// The page has a region dropdown, a system type dropdown and a year slider. Every change
    /// redraws the line chart of waste over time for the selected region and system type, up to
    /// the selected year.
    Serve(ServeArgs),
    /// Serve the combo chart: waste by state as stacked bars with the national cumulative totals
    /// drawn as lines on a secondary axis.
    ServeCombo(ServeArgs),
    /// Write the combo chart to a standalone HTML file.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// A JSON file that overrides the default data paths and settings.
    #[arg(long, env = "SOLAR_WASTE_CONFIG")]
    config: Option<PathBuf>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

/// Args for the `serve` and `serve-combo` commands.
#[derive(Debug, ClapArgs, Clone)]
pub struct ServeArgs {
    /// The address to listen on. Defaults to 127.0.0.1:8050.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

impl ServeArgs {
    pub fn bind(&self) -> Option<SocketAddr> {
        self.bind
    }
}

/// Args for the `export` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct ExportArgs {
    /// Where to write the HTML file. Defaults to output/solar_waste_combo.html.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
