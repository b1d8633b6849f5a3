//! Display-ready views over a shipment batch.
//!
//! These functions shape the current batch for the dashboard: map points,
//! the daily delay trend, the list of largest delays, and the text blocks
//! printed for KPIs, shipment cards, details and predictions.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{DelayPrediction, Kpis};
use crate::shipment::{ShipmentRecord, VesselStatus};

/// Message shown when a lookup finds nothing.
pub const NOT_FOUND_MESSAGE: &str = "Shipment not found. Please check the ID and try again.";

/// A vessel position for the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Vessel name.
    pub vessel: String,
    /// Vessel status.
    pub status: VesselStatus,
}

/// Average delay for the shipments arriving on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// ETA date.
    pub date: NaiveDate,
    /// Mean `delay_minutes` of shipments arriving on this date.
    pub avg_delay_minutes: f64,
    /// Trailing moving average of `avg_delay_minutes`.
    pub moving_avg: f64,
}

/// Build the map view, one point per shipment in batch order.
#[must_use]
pub fn map_points(shipments: &[ShipmentRecord]) -> Vec<MapPoint> {
    shipments
        .iter()
        .map(|s| MapPoint {
            lat: s.current_lat,
            lon: s.current_lon,
            vessel: s.vessel_name.clone(),
            status: s.status,
        })
        .collect()
}

/// Build the delay trend, ascending by ETA date.
///
/// Shipments are grouped by the calendar date of their ETA and each group
/// is reduced to its mean delay. `moving_avg` averages the last `window`
/// groups, using however many are available at the start of the series.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn delay_trend(shipments: &[ShipmentRecord], window: usize) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for s in shipments {
        let entry = by_date.entry(s.eta.date_naive()).or_default();
        entry.0 += u64::from(s.delay_minutes);
        entry.1 += 1;
    }

    let daily: Vec<(NaiveDate, f64)> = by_date
        .into_iter()
        .map(|(date, (sum, count))| (date, sum as f64 / count as f64))
        .collect();

    let window = window.max(1);
    daily
        .iter()
        .enumerate()
        .map(|(i, &(date, avg_delay_minutes))| {
            let start = (i + 1).saturating_sub(window);
            let trailing = &daily[start..=i];
            let moving_avg =
                trailing.iter().map(|(_, avg)| avg).sum::<f64>() / trailing.len() as f64;
            TrendPoint {
                date,
                avg_delay_minutes,
                moving_avg,
            }
        })
        .collect()
}

/// The delayed shipments with the largest delays first, at most `limit`.
///
/// Shipments with equal delays keep their batch order.
#[must_use]
pub fn recent_delays(shipments: &[ShipmentRecord], limit: usize) -> Vec<&ShipmentRecord> {
    let mut delayed: Vec<_> = shipments.iter().filter(|s| s.is_delayed).collect();
    delayed.sort_by(|a, b| b.delay_minutes.cmp(&a.delay_minutes));
    delayed.truncate(limit);
    delayed
}

/// Render the KPI panel.
#[must_use]
pub fn render_kpis(kpis: &Kpis) -> String {
    format!(
        "Average Delay (min): {}\nSuccess Rate:        {}%\nActive Shipments:    {}\n",
        kpis.avg_delay, kpis.success_rate, kpis.active_count
    )
}

/// Render the one-line overview card for a shipment.
#[must_use]
pub fn shipment_card(shipment: &ShipmentRecord) -> String {
    let mut card = format!(
        "{} ({}) | Status: {} | ETA: {}",
        shipment.vessel_name,
        shipment.shipment_id,
        shipment.status,
        shipment.eta.format("%b %d, %Y")
    );
    if shipment.is_delayed {
        let _ = write!(card, " | Delayed: {} min", shipment.delay_minutes);
    }
    card
}

/// Render the detail block shown after a successful lookup.
#[must_use]
pub fn shipment_details(shipment: &ShipmentRecord) -> String {
    let mut details = format!(
        "Vessel: {}\n\
         - Shipment ID: {}\n\
         - Status: {}\n\
         - Route: {}\n\
         - Containers: {}\n\
         - Weight: {} kg\n\
         - Created: {}\n\
         - ETA: {}\n",
        shipment.vessel_name,
        shipment.shipment_id,
        shipment.status,
        shipment.route,
        group_thousands(u64::from(shipment.containers_count)),
        group_thousands(u64::from(shipment.weight_kg)),
        shipment.created_at.format("%Y-%m-%d %H:%M"),
        shipment.eta.format("%Y-%m-%d %H:%M"),
    );

    if shipment.is_delayed {
        let _ = writeln!(details, "- Delay: {} minutes", shipment.delay_minutes);
        let reason = shipment
            .delay_reason
            .map_or_else(|| "None".to_string(), |r| r.to_string());
        let _ = writeln!(details, "- Reason: {reason}");
    }

    details
}

/// Render the outcome of a delay prediction.
#[must_use]
pub fn render_prediction(prediction: &DelayPrediction) -> String {
    if !prediction.will_be_delayed {
        return "On-time delivery expected\n".to_string();
    }

    let mut text = String::from("Potential Delay Predicted\nRisk Factors:\n");
    for factor in &prediction.risk_factors {
        let _ = writeln!(text, "- {factor}");
    }
    let _ = writeln!(text, "Confidence: {}%", prediction.confidence);
    text
}

/// Render the line announcing a found shipment.
#[must_use]
pub fn found_line(shipment: &ShipmentRecord) -> String {
    format!("Found: {} ({})", shipment.vessel_name, shipment.shipment_id)
}

/// Render a trend row.
#[must_use]
pub fn trend_row(point: &TrendPoint) -> String {
    format!(
        "{}  avg {:>7.1} min  moving avg {:>7.1} min",
        point.date, point.avg_delay_minutes, point.moving_avg
    )
}

/// Render a recent delay entry.
#[must_use]
pub fn delay_entry(shipment: &ShipmentRecord) -> String {
    let reason = shipment
        .delay_reason
        .map_or_else(|| "None".to_string(), |r| r.to_string());
    format!(
        "- {}: {} min delay ({})",
        shipment.vessel_name, shipment.delay_minutes, reason
    )
}

/// Render a map point.
#[must_use]
pub fn map_row(point: &MapPoint) -> String {
    format!(
        "{:>9.4} {:>10.4}  {} [{}]",
        point.lat, point.lon, point.vessel, point.status
    )
}

/// Format an integer with comma thousands separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
