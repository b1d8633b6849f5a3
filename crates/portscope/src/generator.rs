//! Synthetic shipment generation.
//!
//! Every randomized field is drawn independently and uniformly from its
//! range or catalog. The random source and the clock are passed in
//! explicitly so batches can be reproduced in tests.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::shipment::{
    shipment_id_for, DelayReason, ShipmentRecord, VesselStatus, ROUTES, VESSEL_NAMES,
};

/// Probability that a generated shipment is delayed.
pub const DELAY_PROBABILITY: f64 = 0.3;

/// Days before generation a shipment may have been booked.
const CREATED_DAYS_AGO: std::ops::RangeInclusive<i64> = 1..=30;

/// Days after generation a shipment may arrive.
const ETA_DAYS_AHEAD: std::ops::RangeInclusive<i64> = 1..=10;

/// Delay applied to delayed shipments, in minutes.
const DELAY_MINUTES: std::ops::RangeInclusive<u32> = 60..=720;

/// Containers aboard a vessel.
const CONTAINERS: std::ops::RangeInclusive<u32> = 100..=5000;

/// Cargo weight in kilograms.
const WEIGHT_KG: std::ops::RangeInclusive<u32> = 50_000..=1_000_000;

/// Builds batches of synthetic shipment records.
#[derive(Debug, Clone, Default)]
pub struct ShipmentGenerator {
    config: GeneratorConfig,
}

impl ShipmentGenerator {
    /// Create a generator with the given configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Get the generator configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `count` records relative to `now`.
    ///
    /// Shipment IDs run `SH1001` through `SH{1000 + count}` in order.
    pub fn generate<R: Rng>(
        &self,
        count: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Vec<ShipmentRecord> {
        let shipments: Vec<_> = (1..=count)
            .map(|sequence| {
                let sequence = u32::try_from(sequence).unwrap_or(u32::MAX);
                self.generate_one(sequence, rng, now)
            })
            .collect();

        debug!(
            "Generated {} shipments ({} delayed)",
            shipments.len(),
            shipments.iter().filter(|s| s.is_delayed).count()
        );
        shipments
    }

    /// Generate a single record with the given sequence number.
    pub fn generate_one<R: Rng>(
        &self,
        sequence: u32,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> ShipmentRecord {
        let vessel_name = VESSEL_NAMES[rng.gen_range(0..VESSEL_NAMES.len())];
        let status = VesselStatus::ALL[rng.gen_range(0..VesselStatus::ALL.len())];
        let route = ROUTES[rng.gen_range(0..ROUTES.len())];

        let created_at = now - Duration::days(rng.gen_range(CREATED_DAYS_AGO));
        let eta = now + Duration::days(rng.gen_range(ETA_DAYS_AHEAD));

        let is_delayed = rng.gen::<f64>() < DELAY_PROBABILITY;
        let (delay_minutes, delay_reason) = if is_delayed {
            let minutes = rng.gen_range(DELAY_MINUTES);
            let reason = DelayReason::ALL[rng.gen_range(0..DelayReason::ALL.len())];
            (minutes, Some(reason))
        } else {
            (0, None)
        };

        let jitter = self.config.jitter_degrees.abs();
        let current_lat = self.config.reference_lat + rng.gen_range(-jitter..=jitter);
        let current_lon = self.config.reference_lon + rng.gen_range(-jitter..=jitter);

        ShipmentRecord {
            shipment_id: shipment_id_for(sequence),
            vessel_name: vessel_name.to_string(),
            status,
            route: route.to_string(),
            created_at,
            eta,
            is_delayed,
            delay_minutes,
            delay_reason,
            current_lat,
            current_lon,
            containers_count: rng.gen_range(CONTAINERS),
            weight_kg: rng.gen_range(WEIGHT_KG),
        }
    }
}

/// Generate `count` records with the default configuration and the current clock.
pub fn generate_shipments<R: Rng>(count: usize, rng: &mut R) -> Vec<ShipmentRecord> {
    ShipmentGenerator::default().generate(count, rng, Utc::now())
}
