//! Key performance indicators for a shipment batch.

use serde::{Deserialize, Serialize};

use crate::shipment::ShipmentRecord;

/// Aggregate figures shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Mean delay in minutes over every shipment, on-time ones included.
    pub avg_delay: f64,
    /// Percentage of shipments that are not delayed.
    pub success_rate: f64,
    /// Number of shipments in the batch.
    pub active_count: usize,
}

impl Default for Kpis {
    fn default() -> Self {
        Self {
            avg_delay: 0.0,
            success_rate: 100.0,
            active_count: 0,
        }
    }
}

/// Compute the KPIs for a batch.
///
/// An empty batch yields the defaults: no delay, a 100% success rate and
/// no active shipments. Both rates are rounded to one decimal place.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(shipments: &[ShipmentRecord]) -> Kpis {
    if shipments.is_empty() {
        return Kpis::default();
    }

    let total = shipments.len();
    let delayed = shipments.iter().filter(|s| s.is_delayed).count();
    let delay_sum: u64 = shipments.iter().map(|s| u64::from(s.delay_minutes)).sum();

    let avg_delay = delay_sum as f64 / total as f64;
    let success_rate = (total - delayed) as f64 / total as f64 * 100.0;

    Kpis {
        avg_delay: round_to_tenth(avg_delay),
        success_rate: round_to_tenth(success_rate),
        active_count: total,
    }
}

/// Round to one decimal place.
///
/// Rounds the exact binary value of `value`, so a true tie such as `15.25`
/// goes to the even digit (`15.2`) and no tie is invented by scaling first.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::tests::sample_record;
    use crate::shipment::DelayReason;

    fn with_delay(minutes: u32) -> ShipmentRecord {
        let mut record = sample_record();
        if minutes > 0 {
            record.is_delayed = true;
            record.delay_minutes = minutes;
            record.delay_reason = Some(DelayReason::PortCongestion);
        }
        record
    }

    #[test]
    fn test_aggregate_empty() {
        let kpis = aggregate(&[]);
        assert_eq!(kpis, Kpis::default());
        assert_eq!(kpis.active_count, 0);
        assert!((kpis.avg_delay - 0.0).abs() < f64::EPSILON);
        assert!((kpis.success_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_no_delays() {
        let shipments: Vec<_> = (0..6).map(|_| with_delay(0)).collect();
        let kpis = aggregate(&shipments);

        assert_eq!(kpis.active_count, 6);
        assert!((kpis.avg_delay - 0.0).abs() < f64::EPSILON);
        assert!((kpis.success_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_mixed_delays() {
        let shipments = vec![with_delay(0), with_delay(100), with_delay(0), with_delay(200)];
        let kpis = aggregate(&shipments);

        assert_eq!(kpis.active_count, 4);
        assert!((kpis.avg_delay - 75.0).abs() < f64::EPSILON);
        assert!((kpis.success_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_rounds_to_one_decimal() {
        // 100 / 3 = 33.33.., 2 of 3 on time = 66.66..%
        let shipments = vec![with_delay(0), with_delay(100), with_delay(0)];
        let kpis = aggregate(&shipments);

        assert!((kpis.avg_delay - 33.3).abs() < 1e-9);
        assert!((kpis.success_rate - 66.7).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_average_tie_goes_to_even() {
        // 61 / 4 = 15.25 exactly
        let shipments = vec![with_delay(61), with_delay(0), with_delay(0), with_delay(0)];
        let kpis = aggregate(&shipments);

        assert!((kpis.avg_delay - 15.2).abs() < 1e-9);
        assert!((kpis.success_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_success_rate_tie_goes_to_even() {
        // 13 of 16 on time = 81.25% exactly
        let mut shipments: Vec<_> = (0..13).map(|_| with_delay(0)).collect();
        shipments.extend((0..3).map(|_| with_delay(60)));
        let kpis = aggregate(&shipments);

        assert_eq!(kpis.active_count, 16);
        assert!((kpis.success_rate - 81.2).abs() < 1e-9);
        assert!((kpis.avg_delay - 11.2).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_all_delayed() {
        let shipments = vec![with_delay(60), with_delay(720)];
        let kpis = aggregate(&shipments);

        assert!((kpis.avg_delay - 390.0).abs() < f64::EPSILON);
        assert!((kpis.success_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_to_tenth() {
        assert!((round_to_tenth(1.25) - 1.2).abs() < 1e-9);
        assert!((round_to_tenth(1.35) - 1.4).abs() < 1e-9);
        assert!((round_to_tenth(0.25) - 0.2).abs() < 1e-9);
        assert!((round_to_tenth(1.24) - 1.2).abs() < 1e-9);
        assert!((round_to_tenth(2.675) - 2.7).abs() < 1e-9);
        assert!((round_to_tenth(100.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kpis_serialize() {
        let json = serde_json::to_string(&Kpis::default()).unwrap();
        assert!(json.contains("avg_delay"));
        assert!(json.contains("success_rate"));
        assert!(json.contains("active_count"));
    }
}
