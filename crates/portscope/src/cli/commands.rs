//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Config;

/// Arguments controlling how the batch is generated.
#[derive(Debug, Clone, Default, Args)]
pub struct BatchArgs {
    /// Number of shipments to generate (overrides configuration)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for reproducible batches (overrides configuration)
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl BatchArgs {
    /// Apply these overrides to a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(count) = self.count {
            config.generator.batch_size = count;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = Some(seed);
        }
    }
}

/// Arguments shared by the view commands.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Batch generation overrides.
    #[command(flatten)]
    pub batch: BatchArgs,
}

/// Lookup command arguments.
#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Shipment ID to find (e.g., SH1001); case and whitespace are ignored
    pub shipment_id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Batch generation overrides.
    #[command(flatten)]
    pub batch: BatchArgs,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
