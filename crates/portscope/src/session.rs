//! Session-scoped dashboard state.
//!
//! A [`Session`] owns the current batch of shipments along with the random
//! source used to generate it and to make predictions. Refreshing replaces
//! the batch wholesale; nothing outlives the session.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::analytics::{self, DelayPrediction, Kpis};
use crate::config::Config;
use crate::generator::ShipmentGenerator;
use crate::shipment::ShipmentRecord;

/// The dashboard state for a single user session.
#[derive(Debug)]
pub struct Session {
    /// Loaded configuration.
    config: Config,
    /// Builds each new batch.
    generator: ShipmentGenerator,
    /// Random source for generation and prediction.
    rng: StdRng,
    /// The current batch, in generation order.
    shipments: Vec<ShipmentRecord>,
    /// When the current batch was generated.
    last_update: DateTime<Utc>,
}

impl Session {
    /// Start a session and generate its first batch.
    ///
    /// The random source is seeded from `generator.seed` when set, otherwise
    /// from the thread-local generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let seed = config
            .generator
            .seed
            .unwrap_or_else(|| rand::thread_rng().next_u64());
        debug!("Seeding session random source with {}", seed);
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Start a session with an explicit random source.
    #[must_use]
    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        let generator = ShipmentGenerator::new(config.generator.clone());
        let mut session = Self {
            config,
            generator,
            rng,
            shipments: Vec::new(),
            last_update: Utc::now(),
        };
        session.refresh();
        session
    }

    /// Discard the current batch and generate a new one.
    pub fn refresh(&mut self) {
        let now = Utc::now();
        self.shipments =
            self.generator
                .generate(self.config.generator.batch_size, &mut self.rng, now);
        self.last_update = now;
        info!("Refreshed batch with {} shipments", self.shipments.len());
    }

    /// Get the loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the current batch.
    #[must_use]
    pub fn shipments(&self) -> &[ShipmentRecord] {
        &self.shipments
    }

    /// Get when the current batch was generated.
    #[must_use]
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// Compute the KPIs for the current batch.
    #[must_use]
    pub fn kpis(&self) -> Kpis {
        analytics::aggregate(&self.shipments)
    }

    /// Find a shipment in the current batch by ID.
    ///
    /// Matching ignores case and surrounding whitespace.
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<&ShipmentRecord> {
        let found = self.shipments.iter().find(|s| s.matches_id(query));
        if found.is_none() {
            debug!("No shipment matches '{}'", query.trim());
        }
        found
    }

    /// Predict a delay for `shipment` against the current clock.
    pub fn predict(&mut self, shipment: &ShipmentRecord) -> DelayPrediction {
        analytics::predict(shipment, Utc::now(), &mut self.rng)
    }

    /// Look up a shipment and predict its delay in one step.
    pub fn lookup_with_prediction(
        &mut self,
        query: &str,
    ) -> Option<(ShipmentRecord, DelayPrediction)> {
        let shipment = self.lookup(query)?.clone();
        let prediction = self.predict(&shipment);
        Some((shipment, prediction))
    }
}
