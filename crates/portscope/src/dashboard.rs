//! Text-mode dashboard.
//!
//! The dashboard renders the views of a [`Session`] to any writer and runs
//! the interactive loop behind `portscope dashboard`. Each action re-reads
//! the session's current batch and recomputes its view from scratch.

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::session::Session;
use crate::views;

const HELP_TEXT: &str = "\
Commands:
  refresh          Replace the batch with freshly generated shipments
  lookup <ID>      Show a shipment and its delay prediction (or type the ID)
  kpis             Show the KPI panel
  overview         Show the KPI panel and every shipment card
  map              Show vessel positions
  trends           Show the delay trend and the largest delays
  help             Show this help
  quit             Leave the dashboard
";

/// A user action in the interactive dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the current batch.
    Refresh,
    /// Look up a shipment by ID.
    Lookup(String),
    /// Show the KPI panel.
    Kpis,
    /// Show KPIs and shipment cards.
    Overview,
    /// Show vessel positions.
    Map,
    /// Show the delay trend.
    Trends,
    /// Show the command list.
    Help,
    /// Leave the dashboard.
    Quit,
}

impl Action {
    /// Parse one line of user input.
    ///
    /// Blank lines yield `None`. Anything that is not a known command is
    /// treated as a shipment ID to look up.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, r)| (c, r.trim()));

        let action = match command.to_ascii_lowercase().as_str() {
            "refresh" | "r" => Self::Refresh,
            "lookup" | "l" | "find" => Self::Lookup(rest.to_string()),
            "kpis" | "k" => Self::Kpis,
            "overview" | "o" => Self::Overview,
            "map" | "m" => Self::Map,
            "trends" | "t" => Self::Trends,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Lookup(line.to_string()),
        };
        Some(action)
    }
}

/// Renders session views to a writer.
#[derive(Debug)]
pub struct Dashboard {
    session: Session,
}

impl Dashboard {
    /// Create a dashboard over a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Get the underlying session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replace the current batch.
    pub fn refresh(&mut self) {
        self.session.refresh();
    }

    /// Write the title and last update time.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_header<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "PortScope - Houston Port Operations")?;
        writeln!(
            out,
            "Last updated: {}",
            self.session.last_update().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out)?;
        Ok(())
    }

    /// Write the KPI panel.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_kpis<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}", views::render_kpis(&self.session.kpis()))?;
        Ok(())
    }

    /// Write the KPI panel followed by one card per shipment.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_overview<W: Write>(&self, out: &mut W) -> Result<()> {
        self.write_kpis(out)?;
        writeln!(out)?;
        writeln!(out, "Shipment Overview")?;
        for shipment in self.session.shipments() {
            writeln!(out, "{}", views::shipment_card(shipment))?;
        }
        Ok(())
    }

    /// Write the vessel positions.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_map<W: Write>(&self, out: &mut W) -> Result<()> {
        let points = views::map_points(self.session.shipments());
        if points.is_empty() {
            writeln!(out, "No vessel data available for mapping.")?;
            return Ok(());
        }

        writeln!(out, "Vessel Locations")?;
        for point in &points {
            writeln!(out, "{}", views::map_row(point))?;
        }
        Ok(())
    }

    /// Write the delay trend and the largest current delays.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_trends<W: Write>(&self, out: &mut W) -> Result<()> {
        let dashboard = &self.session.config().dashboard;
        let shipments = self.session.shipments();

        let trend = views::delay_trend(shipments, dashboard.trend_window);
        if trend.is_empty() {
            writeln!(out, "Insufficient data to display delay trends.")?;
            return Ok(());
        }

        writeln!(out, "Delay Trends")?;
        for point in &trend {
            writeln!(out, "{}", views::trend_row(point))?;
        }

        writeln!(out)?;
        writeln!(out, "Recent Delays")?;
        let delays = views::recent_delays(shipments, dashboard.recent_delays_limit);
        if delays.is_empty() {
            writeln!(out, "No recent delays to report.")?;
        }
        for shipment in delays {
            writeln!(out, "{}", views::delay_entry(shipment))?;
        }
        Ok(())
    }

    /// Look up a shipment and write its prediction and details.
    ///
    /// Returns `false` and writes the not-found message when no shipment in
    /// the current batch matches `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_lookup<W: Write>(&mut self, query: &str, out: &mut W) -> Result<bool> {
        let Some((shipment, prediction)) = self.session.lookup_with_prediction(query) else {
            writeln!(out, "{}", views::NOT_FOUND_MESSAGE)?;
            return Ok(false);
        };

        writeln!(out, "{}", views::found_line(&shipment))?;
        write!(out, "{}", views::render_prediction(&prediction))?;
        writeln!(out)?;
        writeln!(out, "Shipment Details")?;
        write!(out, "{}", views::shipment_details(&shipment))?;
        Ok(true)
    }

    /// Run the interactive loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        info!("Starting interactive dashboard");
        self.write_header(out)?;
        self.write_kpis(out)?;
        writeln!(out)?;
        writeln!(out, "Type 'help' for commands.")?;
        prompt(out)?;

        for line in input.lines() {
            let line = line?;
            let Some(action) = Action::parse(&line) else {
                prompt(out)?;
                continue;
            };
            debug!("Dashboard action: {:?}", action);

            match action {
                Action::Quit => break,
                Action::Refresh => {
                    self.refresh();
                    self.write_header(out)?;
                    self.write_kpis(out)?;
                }
                Action::Lookup(query) if query.is_empty() => {
                    writeln!(out, "Enter Shipment ID (e.g., SH1001)")?;
                }
                Action::Lookup(query) => {
                    self.write_lookup(&query, out)?;
                }
                Action::Kpis => self.write_kpis(out)?,
                Action::Overview => self.write_overview(out)?,
                Action::Map => self.write_map(out)?,
                Action::Trends => self.write_trends(out)?,
                Action::Help => write!(out, "{HELP_TEXT}")?,
            }
            prompt(out)?;
        }

        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Write `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logging::init_test_logging;

    fn dashboard(batch_size: usize) -> Dashboard {
        init_test_logging();
        let mut config = Config::default();
        config.generator.batch_size = batch_size;
        config.generator.seed = Some(2024);
        Dashboard::new(Session::new(config))
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("   "), None);
        assert_eq!(Action::parse("refresh"), Some(Action::Refresh));
        assert_eq!(Action::parse("QUIT"), Some(Action::Quit));
        assert_eq!(Action::parse("map"), Some(Action::Map));
        assert_eq!(
            Action::parse("lookup  sh1004 "),
            Some(Action::Lookup("sh1004".to_string()))
        );
        assert_eq!(Action::parse("lookup"), Some(Action::Lookup(String::new())));
        assert_eq!(
            Action::parse(" SH1002 "),
            Some(Action::Lookup("SH1002".to_string()))
        );
    }

    #[test]
    fn test_write_overview_lists_every_shipment() {
        let dash = dashboard(6);
        let text = render(|out| dash.write_overview(out));

        assert!(text.contains("Active Shipments:    6"));
        for n in 1001..=1006 {
            assert!(text.contains(&format!("(SH{n})")));
        }
    }

    #[test]
    fn test_write_map() {
        let dash = dashboard(3);
        let text = render(|out| dash.write_map(out));
        assert!(text.starts_with("Vessel Locations"));
        assert_eq!(text.lines().count(), 4);

        let empty = dashboard(0);
        let text = render(|out| empty.write_map(out));
        assert_eq!(text, "No vessel data available for mapping.\n");
    }

    #[test]
    fn test_write_trends() {
        let dash = dashboard(30);
        let text = render(|out| dash.write_trends(out));
        assert!(text.starts_with("Delay Trends"));
        assert!(text.contains("Recent Delays"));

        let empty = dashboard(0);
        let text = render(|out| empty.write_trends(out));
        assert_eq!(text, "Insufficient data to display delay trends.\n");
    }

    #[test]
    fn test_write_lookup_found() {
        let mut dash = dashboard(5);
        let mut out = Vec::new();
        let found = dash.write_lookup(" sh1002 ", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(found);
        assert!(text.contains("(SH1002)"));
        assert!(text.contains("Shipment Details"));
        assert!(
            text.contains("Potential Delay Predicted") || text.contains("On-time delivery expected")
        );
    }

    #[test]
    fn test_write_lookup_not_found() {
        let mut dash = dashboard(5);
        let mut out = Vec::new();
        let found = dash.write_lookup("SH2000", &mut out).unwrap();

        assert!(!found);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", views::NOT_FOUND_MESSAGE)
        );
    }

    #[test]
    fn test_run_processes_actions_until_quit() {
        let mut dash = dashboard(4);
        let input = b"kpis\n\nsh1001\nrefresh\nSH9999\nquit\nmap\n";
        let mut out = Vec::new();
        dash.run(&input[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Found:"));
        assert!(text.contains(views::NOT_FOUND_MESSAGE));
        assert_eq!(text.matches("PortScope - Houston Port Operations").count(), 2);
        // Nothing after quit is processed.
        assert!(!text.contains("Vessel Locations"));
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let mut dash = dashboard(2);
        let mut out = Vec::new();
        dash.run(&b"help\n"[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Commands:"));
    }

    #[test]
    fn test_write_json() {
        let dash = dashboard(2);
        let text = render(|out| write_json(out, &dash.session().kpis()));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["active_count"], 2);
    }
}
