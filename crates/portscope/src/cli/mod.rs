//! Command-line interface for portscope.
//!
//! This module provides the CLI structure for the `portscope` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::Verbosity;

pub use commands::{BatchArgs, ConfigCommand, LookupCommand, ViewCommand};

/// portscope - Houston port logistics dashboard
///
/// Generates a batch of simulated vessel shipments and shows KPIs, vessel
/// positions, delay trends and rule-based delay predictions for them.
#[derive(Debug, Parser)]
#[command(name = "portscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show KPIs and a card for every shipment
    Overview(ViewCommand),

    /// Show vessel positions
    Map(ViewCommand),

    /// Show the delay trend and the largest delays
    Trends(ViewCommand),

    /// Look up a shipment and predict its delay
    Lookup(LookupCommand),

    /// Run the interactive dashboard
    Dashboard(BatchArgs),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Get the batch arguments of the selected command, if it has any.
    #[must_use]
    pub fn batch_args(&self) -> Option<&BatchArgs> {
        match &self.command {
            Command::Overview(cmd) | Command::Map(cmd) | Command::Trends(cmd) => Some(&cmd.batch),
            Command::Lookup(cmd) => Some(&cmd.batch),
            Command::Dashboard(batch) => Some(batch),
            Command::Config(_) => None,
        }
    }

    /// Get the file `config validate` should check, if that is the command.
    ///
    /// Validation reads only this file, so a broken default configuration
    /// never stops another file from being checked. Falls back to `--config`
    /// and then to the default path.
    #[must_use]
    pub fn validate_target(&self) -> Option<PathBuf> {
        match &self.command {
            Command::Config(ConfigCommand::Validate { file }) => Some(
                file.clone()
                    .or_else(|| self.config.clone())
                    .unwrap_or_else(Config::default_config_path),
            ),
            _ => None,
        }
    }
}
