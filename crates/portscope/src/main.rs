//! `portscope` - CLI for the portscope dashboard
//!
//! This binary renders the dashboard views for a freshly generated batch of
//! simulated shipments, either once per command or interactively.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::path::Path;

use clap::Parser;

use portscope::cli::{Cli, Command, ConfigCommand, LookupCommand, ViewCommand};
use portscope::dashboard::{write_json, Dashboard};
use portscope::{init_logging, views, Config, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Validation checks one file on its own, before anything else is loaded
    if let Some(path) = cli.validate_target() {
        handle_validate(&path, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    // Load configuration, then apply command-line batch overrides
    let mut config = Config::load_from(cli.config.clone())?;
    if let Some(batch) = cli.batch_args() {
        batch.apply(&mut config);
    }

    match cli.command {
        Command::Overview(cmd) => handle_overview(config, &cmd, &mut out)?,
        Command::Map(cmd) => handle_map(config, &cmd, &mut out)?,
        Command::Trends(cmd) => handle_trends(config, &cmd, &mut out)?,
        Command::Lookup(cmd) => handle_lookup(config, &cmd, &mut out)?,
        Command::Dashboard(_) => {
            let mut dashboard = Dashboard::new(Session::new(config));
            dashboard.run(io::stdin().lock(), &mut out)?;
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn handle_overview(
    config: Config,
    cmd: &ViewCommand,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(config);
    if cmd.json {
        write_json(
            out,
            &serde_json::json!({
                "last_update": session.last_update(),
                "kpis": session.kpis(),
                "shipments": session.shipments(),
            }),
        )?;
    } else {
        let dashboard = Dashboard::new(session);
        dashboard.write_header(out)?;
        dashboard.write_overview(out)?;
    }
    Ok(())
}

fn handle_map(
    config: Config,
    cmd: &ViewCommand,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(config);
    if cmd.json {
        write_json(out, &views::map_points(session.shipments()))?;
    } else {
        Dashboard::new(session).write_map(out)?;
    }
    Ok(())
}

fn handle_trends(
    config: Config,
    cmd: &ViewCommand,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(config);
    if cmd.json {
        let dashboard = &session.config().dashboard;
        let trend = views::delay_trend(session.shipments(), dashboard.trend_window);
        let delays = views::recent_delays(session.shipments(), dashboard.recent_delays_limit);
        write_json(
            out,
            &serde_json::json!({
                "trend": trend,
                "recent_delays": delays,
            }),
        )?;
    } else {
        Dashboard::new(session).write_trends(out)?;
    }
    Ok(())
}

fn handle_lookup(
    config: Config,
    cmd: &LookupCommand,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(config);
    if cmd.json {
        let result = session.lookup_with_prediction(&cmd.shipment_id).map_or_else(
            || serde_json::json!({ "found": false, "message": views::NOT_FOUND_MESSAGE }),
            |(shipment, prediction)| {
                serde_json::json!({
                    "found": true,
                    "shipment": shipment,
                    "prediction": prediction,
                })
            },
        );
        write_json(out, &result)?;
    } else {
        Dashboard::new(session).write_lookup(&cmd.shipment_id, out)?;
    }
    Ok(())
}

fn handle_config(
    config: &Config,
    cmd: ConfigCommand,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                write_json(out, config)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Generator]")?;
                writeln!(out, "  Batch size:         {}", config.generator.batch_size)?;
                match config.generator.seed {
                    Some(seed) => writeln!(out, "  Seed:               {seed}")?,
                    None => writeln!(out, "  Seed:               (random)")?,
                }
                writeln!(
                    out,
                    "  Reference point:    {}, {}",
                    config.generator.reference_lat, config.generator.reference_lon
                )?;
                writeln!(
                    out,
                    "  Jitter (degrees):   {}",
                    config.generator.jitter_degrees
                )?;
                writeln!(out)?;
                writeln!(out, "[Dashboard]")?;
                writeln!(
                    out,
                    "  Recent delays:      {}",
                    config.dashboard.recent_delays_limit
                )?;
                writeln!(out, "  Trend window:       {}", config.dashboard.trend_window)?;
            }
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", Config::default_config_path().display())?;
        }
        ConfigCommand::Validate { file } => {
            handle_validate(&file.unwrap_or_else(Config::default_config_path), out)?;
        }
    }
    Ok(())
}

fn handle_validate(path: &Path, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(out, "Validating configuration: {}", path.display())?;
    match Config::load_from(Some(path.to_path_buf())) {
        Ok(_) => writeln!(out, "Configuration is valid.")?,
        Err(e) if e.is_config_error() => writeln!(out, "Configuration error: {e}")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
