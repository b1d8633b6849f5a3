//! Summary statistics and delay prediction over shipment batches.
//!
//! - **KPIs**: average delay, on-time success rate and the number of active
//!   shipments in a batch.
//!
//! - **Delay prediction**: a rule-based heuristic that flags shipments at
//!   risk of running late. It is not a statistical model.
//!
//! # Example
//!
//! ```
//! use portscope::analytics::aggregate;
//!
//! let kpis = aggregate(&[]);
//! assert_eq!(kpis.active_count, 0);
//! assert!((kpis.success_rate - 100.0).abs() < f64::EPSILON);
//! ```

mod kpi;
mod predictor;

pub use kpi::{aggregate, round_to_tenth, Kpis};
pub use predictor::{
    days_until, predict, vessel_history_bucket, DelayPrediction, RiskFactor, NO_RISKS,
};
