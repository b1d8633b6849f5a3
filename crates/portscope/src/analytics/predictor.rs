//! Rule-based delay prediction.
//!
//! Three rules are evaluated in order, each contributing a risk factor:
//! a tight ETA, congestion on the Asia corridor (a coin flip weighted 40%),
//! and a vessel history bucket derived from a stable hash of the vessel
//! name. Two or more factors predict a delay; a single factor predicts one
//! half of the time.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::shipment::ShipmentRecord;

/// Risk entry reported when no delay is predicted.
pub const NO_RISKS: &str = "No significant risks identified";

/// Shipments arriving in fewer whole days than this have a tight ETA.
const TIGHT_ETA_DAYS: i64 = 2;

/// Route congestion fires when a uniform draw exceeds this.
const ROUTE_CONGESTION_THRESHOLD: f64 = 0.6;

/// A lone risk factor predicts a delay when a uniform draw exceeds this.
const SINGLE_FACTOR_THRESHOLD: f64 = 0.5;

/// Number of vessel history buckets; bucket zero has a history of delays.
const VESSEL_HISTORY_BUCKETS: u64 = 5;

/// Confidence contributed by each risk factor, in percent.
const CONFIDENCE_PER_FACTOR: u32 = 30;

/// Confidence never exceeds this, in percent.
const MAX_CONFIDENCE: u32 = 90;

/// A named condition contributing to a delay prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Fewer than two whole days remain until the ETA.
    EtaTooTight,
    /// The Asia corridor is congested.
    RouteCongestion,
    /// The vessel is frequently late.
    VesselHistory,
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EtaTooTight => write!(f, "ETA too tight"),
            Self::RouteCongestion => write!(f, "Route congestion"),
            Self::VesselHistory => write!(f, "Vessel history of delays"),
        }
    }
}

/// Outcome of a delay prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayPrediction {
    /// Whether the shipment is expected to run late.
    pub will_be_delayed: bool,
    /// Labels of the factors that fired, or [`NO_RISKS`] when no delay is predicted.
    pub risk_factors: Vec<String>,
    /// Confidence in percent: 30 per factor that fired, capped at 90.
    pub confidence: u32,
}

/// Predict whether `shipment` will be delayed, as seen at `now`.
///
/// The Asia corridor rule draws from `rng` only for Asia routes, and the
/// tie-break draw happens only when exactly one factor fired. Confidence
/// counts every factor that fired, even when the prediction is negative.
pub fn predict<R: Rng>(
    shipment: &ShipmentRecord,
    now: DateTime<Utc>,
    rng: &mut R,
) -> DelayPrediction {
    let mut factors = Vec::new();

    if days_until(shipment.eta, now) < TIGHT_ETA_DAYS {
        factors.push(RiskFactor::EtaTooTight);
    }

    if shipment.is_asia_route() && rng.gen::<f64>() > ROUTE_CONGESTION_THRESHOLD {
        factors.push(RiskFactor::RouteCongestion);
    }

    if vessel_history_bucket(&shipment.vessel_name) == 0 {
        factors.push(RiskFactor::VesselHistory);
    }

    let will_be_delayed = factors.len() > 1
        || (factors.len() == 1 && rng.gen::<f64>() > SINGLE_FACTOR_THRESHOLD);

    let confidence = u32::try_from(factors.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(CONFIDENCE_PER_FACTOR)
        .min(MAX_CONFIDENCE);

    trace!(
        shipment_id = %shipment.shipment_id,
        factors = factors.len(),
        will_be_delayed,
        "Predicted delay"
    );

    let risk_factors = if will_be_delayed {
        factors.iter().map(ToString::to_string).collect()
    } else {
        vec![NO_RISKS.to_string()]
    };

    DelayPrediction {
        will_be_delayed,
        risk_factors,
        confidence,
    }
}

/// Whole days from `now` until `eta`, rounded down.
///
/// An ETA six hours in the past is `-1` days away, as is an ETA half a
/// second in the past.
#[must_use]
pub fn days_until(eta: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = eta - now;
    let days = remaining.num_days();
    // num_days truncates toward zero
    if remaining < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Vessel history bucket in `0..5` for a vessel name.
///
/// The name's UTF-8 bytes are hashed with BLAKE3 and the first eight bytes
/// of the digest, read as a little-endian `u64`, are reduced modulo 5. The
/// result is identical across runs and platforms.
#[must_use]
pub fn vessel_history_bucket(vessel_name: &str) -> u64 {
    let digest = blake3::hash(vessel_name.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(prefix) % VESSEL_HISTORY_BUCKETS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::tests::sample_record;
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    /// Every uniform draw from this source is just below 1.0.
    fn high_draws() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    /// Every uniform draw from this source is 0.0.
    fn low_draws() -> StepRng {
        StepRng::new(0, 0)
    }

    fn vessel_in_bucket(matches: impl Fn(u64) -> bool) -> String {
        (0..1000)
            .map(|i| format!("Test Vessel {i}"))
            .find(|name| matches(vessel_history_bucket(name)))
            .expect("no vessel name found for bucket")
    }

    fn shipment(eta_days: i64, route: &str, vessel: &str) -> ShipmentRecord {
        let mut record = sample_record();
        record.eta = fixed_now() + Duration::days(eta_days);
        record.route = route.to_string();
        record.vessel_name = vessel.to_string();
        record
    }

    #[test]
    fn test_risk_factor_display() {
        assert_eq!(RiskFactor::EtaTooTight.to_string(), "ETA too tight");
        assert_eq!(RiskFactor::RouteCongestion.to_string(), "Route congestion");
        assert_eq!(
            RiskFactor::VesselHistory.to_string(),
            "Vessel history of delays"
        );
    }

    #[test]
    fn test_days_until_rounds_down() {
        let now = fixed_now();
        assert_eq!(days_until(now + Duration::days(3), now), 3);
        assert_eq!(days_until(now + Duration::hours(47), now), 1);
        assert_eq!(days_until(now + Duration::hours(48), now), 2);
        assert_eq!(days_until(now, now), 0);
        assert_eq!(days_until(now - Duration::hours(6), now), -1);
    }

    #[test]
    fn test_days_until_rounds_down_below_a_second() {
        let now = fixed_now();
        assert_eq!(days_until(now - Duration::milliseconds(500), now), -1);
        assert_eq!(days_until(now - Duration::nanoseconds(1), now), -1);
        assert_eq!(days_until(now + Duration::days(1) - Duration::milliseconds(1), now), 0);
        assert_eq!(days_until(now - Duration::days(2) - Duration::nanoseconds(1), now), -3);
        assert_eq!(days_until(now - Duration::days(2), now), -2);
    }

    #[test]
    fn test_vessel_history_bucket_is_stable() {
        for name in crate::shipment::VESSEL_NAMES {
            let bucket = vessel_history_bucket(name);
            assert!(bucket < 5);
            assert_eq!(bucket, vessel_history_bucket(name));
        }
    }

    #[test]
    fn test_vessel_history_bucket_spreads_names() {
        let buckets: std::collections::HashSet<_> = (0..200)
            .map(|i| vessel_history_bucket(&format!("Test Vessel {i}")))
            .collect();
        assert_eq!(buckets.len(), 5);
    }

    #[test]
    fn test_predict_no_risk_factors() {
        let vessel = vessel_in_bucket(|b| b != 0);
        let record = shipment(4, "Europe - Houston", &vessel);

        for seed in 0..20 {
            let prediction = predict(&record, fixed_now(), &mut StdRng::seed_from_u64(seed));
            assert!(!prediction.will_be_delayed);
            assert_eq!(prediction.confidence, 0);
            assert_eq!(prediction.risk_factors, vec![NO_RISKS.to_string()]);
        }
    }

    #[test]
    fn test_predict_two_deterministic_factors() {
        let vessel = vessel_in_bucket(|b| b == 0);
        let record = shipment(1, "Gulf - Houston", &vessel);

        let prediction = predict(&record, fixed_now(), &mut low_draws());
        assert!(prediction.will_be_delayed);
        assert_eq!(prediction.confidence, 60);
        assert_eq!(
            prediction.risk_factors,
            vec![
                "ETA too tight".to_string(),
                "Vessel history of delays".to_string()
            ]
        );
    }

    #[test]
    fn test_predict_single_factor_high_draw() {
        let vessel = vessel_in_bucket(|b| b != 0);
        let record = shipment(1, "Europe - Houston", &vessel);

        let prediction = predict(&record, fixed_now(), &mut high_draws());
        assert!(prediction.will_be_delayed);
        assert_eq!(prediction.confidence, 30);
        assert_eq!(prediction.risk_factors, vec!["ETA too tight".to_string()]);
    }

    #[test]
    fn test_predict_single_factor_low_draw() {
        let vessel = vessel_in_bucket(|b| b != 0);
        let record = shipment(1, "Europe - Houston", &vessel);

        let prediction = predict(&record, fixed_now(), &mut low_draws());
        assert!(!prediction.will_be_delayed);
        assert_eq!(prediction.confidence, 30);
        assert_eq!(prediction.risk_factors, vec![NO_RISKS.to_string()]);
    }

    #[test]
    fn test_predict_route_congestion_on_asia_route() {
        let vessel = vessel_in_bucket(|b| b != 0);
        let record = shipment(5, "Asia - Houston", &vessel);

        let congested = predict(&record, fixed_now(), &mut high_draws());
        assert!(congested.will_be_delayed);
        assert_eq!(congested.risk_factors, vec!["Route congestion".to_string()]);

        let clear = predict(&record, fixed_now(), &mut low_draws());
        assert!(!clear.will_be_delayed);
        assert_eq!(clear.confidence, 0);
    }

    #[test]
    fn test_predict_all_factors_confidence_capped() {
        let vessel = vessel_in_bucket(|b| b == 0);
        let record = shipment(0, "Asia - Houston", &vessel);

        let prediction = predict(&record, fixed_now(), &mut high_draws());
        assert!(prediction.will_be_delayed);
        assert_eq!(prediction.risk_factors.len(), 3);
        assert_eq!(prediction.confidence, 90);
    }

    #[test]
    fn test_predict_depends_on_clock() {
        let vessel = vessel_in_bucket(|b| b != 0);
        let record = shipment(3, "Europe - Houston", &vessel);

        let early = predict(&record, fixed_now(), &mut high_draws());
        assert_eq!(early.confidence, 0);

        let later = predict(&record, fixed_now() + Duration::days(2), &mut high_draws());
        assert_eq!(later.confidence, 30);
        assert!(later.will_be_delayed);
    }

    #[test]
    fn test_prediction_serialize() {
        let prediction = DelayPrediction {
            will_be_delayed: false,
            risk_factors: vec![NO_RISKS.to_string()],
            confidence: 0,
        };
        let json = serde_json::to_string(&prediction).unwrap();
        assert!(json.contains("will_be_delayed"));
        assert!(json.contains(NO_RISKS));
    }
}
