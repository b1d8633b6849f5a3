//! `portscope` - A simulated logistics monitoring dashboard
//!
//! This library generates synthetic vessel shipment batches, computes summary
//! KPIs and rule-based delay predictions over them, and shapes the results
//! into the views shown by the `portscope` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod logging;
pub mod session;
pub mod shipment;
pub mod views;

pub use analytics::{aggregate, predict, DelayPrediction, Kpis};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use generator::{generate_shipments, ShipmentGenerator};
pub use logging::init_logging;
pub use session::Session;
pub use shipment::{DelayReason, ShipmentRecord, VesselStatus};
