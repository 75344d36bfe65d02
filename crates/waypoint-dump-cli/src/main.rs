//! waypoint-dump - Export JourneyMap WaypointData.dat files
//!
//! Usage:
//!   waypoint-dump <input>                 - Export into ./export with default settings
//!   waypoint-dump dump <input> [-o dir]   - Export with config file and overrides
//!   waypoint-dump inspect <input>         - Show container and structure information

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use waypoint_dump::utils::format_size;
use waypoint_dump::{dump_waypoints, inspect_file, Config, ExportSummary};

#[derive(Parser)]
#[command(name = "waypoint-dump")]
#[command(version = "0.1.0")]
#[command(about = "Export JourneyMap waypoints to JSON, CSV and /waypoint commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to WaypointData.dat (for quick export mode)
    input: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a waypoint file and write all exports
    Dump {
        /// Path to WaypointData.dat (raw, gzip, zlib or zip)
        input: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "export")]
        output: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Show what a waypoint file contains without writing anything
    Inspect {
        /// Path to WaypointData.dat
        input: PathBuf,
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Overrides {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Player name appended to every command
    #[arg(short, long)]
    player: Option<String>,
    /// Group id for waypoints without one
    #[arg(long)]
    default_group: Option<String>,
    /// Y offset applied to the offset group
    #[arg(long, allow_negative_numbers = true)]
    y_offset: Option<i32>,
    /// Z offset applied to the offset group
    #[arg(long, allow_negative_numbers = true)]
    z_offset: Option<i32>,
    /// Group id to skip (repeatable, replaces the default list)
    #[arg(long = "system-group")]
    system_groups: Vec<String>,
}

impl Overrides {
    fn into_config(self) -> Result<Config> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(player) = self.player {
            config.player = player;
        }
        if let Some(group) = self.default_group {
            config.default_group_id = group;
        }
        if let Some(y) = self.y_offset {
            config.y_offset = y;
        }
        if let Some(z) = self.z_offset {
            config.z_offset = z;
        }
        if !self.system_groups.is_empty() {
            config.system_groups = self.system_groups;
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary:");
    println!("  Container: {}", summary.format);
    println!("  Waypoint rows: {}", summary.record_count);
    println!(
        "  Commands: {} in {} groups",
        summary.command_count, summary.group_count
    );
    println!("  Files:");
    for path in &summary.written {
        println!("    {}", path.display());
    }
}

fn inspect(input: &Path, config: &Config) -> Result<()> {
    let artifacts = inspect_file(input, config)?;

    println!("File: {}", input.display());
    println!("  Container: {}", artifacts.format);
    println!(
        "  Decompressed size: {}",
        format_size(artifacts.decompressed_size as u64)
    );
    println!("  Root name: {:?}", artifacts.root_name);
    println!("  Top-level keys ({}):", artifacts.top_level_keys.len());
    for key in &artifacts.top_level_keys {
        println!("    {}", key);
    }
    println!("  Waypoint rows: {}", artifacts.record_count);
    println!(
        "  Commands: {} in {} groups",
        artifacts.command_count, artifacts.group_count
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Dump {
            input,
            output,
            overrides,
        }) => {
            let config = overrides.into_config()?;
            let summary = dump_waypoints(&input, &output, &config)?;
            print_summary(&summary);
        }
        Some(Commands::Inspect { input, config }) => {
            let config = load_config(config.as_deref())?;
            inspect(&input, &config)?;
        }
        None => {
            // Quick export mode
            if let Some(input) = cli.input {
                let summary = dump_waypoints(&input, Path::new("export"), &Config::default())?;
                print_summary(&summary);
            } else {
                eprintln!("Usage: waypoint-dump <input>");
                eprintln!("       waypoint-dump dump <input> [-o output] [-c config] [-p player]");
                eprintln!("       waypoint-dump inspect <input>");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
