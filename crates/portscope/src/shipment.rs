//! Core shipment types for portscope.
//!
//! This module defines the simulated vessel shipment record and the fixed
//! catalogs that synthetic records are drawn from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Offset added to a record's sequence number to form its shipment ID.
pub const SHIPMENT_ID_OFFSET: u32 = 1000;

/// Substring identifying the Asia trade corridor in route names.
pub const ASIA_CORRIDOR: &str = "Asia";

/// Vessel names that synthetic shipments are assigned from.
pub const VESSEL_NAMES: [&str; 10] = [
    "MSC Isabella",
    "Maersk Houston",
    "CMA CGM Brazil",
    "Ever Given",
    "Cosco Shipping",
    "MOL Treasure",
    "APL Charleston",
    "HMM Rotterdam",
    "ONE Innovation",
    "Yang Ming Unity",
];

/// Corridor names that synthetic shipments travel along.
pub const ROUTES: [&str; 5] = [
    "Asia - Houston",
    "Europe - Houston",
    "South America - Houston",
    "West Coast - Houston",
    "Gulf - Houston",
];

/// Operational status of a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselStatus {
    /// Moored inside the port.
    AtPort,
    /// Travelling between ports.
    InTransit,
    /// Holding at an anchorage.
    Anchored,
    /// Alongside a berth.
    Docked,
    /// Making way under its own power.
    Underway,
}

impl VesselStatus {
    /// Every status, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::AtPort,
        Self::InTransit,
        Self::Anchored,
        Self::Docked,
        Self::Underway,
    ];
}

impl std::fmt::Display for VesselStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtPort => write!(f, "At Port"),
            Self::InTransit => write!(f, "In Transit"),
            Self::Anchored => write!(f, "Anchored"),
            Self::Docked => write!(f, "Docked"),
            Self::Underway => write!(f, "Underway"),
        }
    }
}

/// Why a delayed shipment is behind schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayReason {
    /// Too many vessels waiting for berths.
    PortCongestion,
    /// Storms, fog or high seas.
    WeatherConditions,
    /// Engine or equipment failure.
    MechanicalIssues,
    /// Crew rotation in progress.
    CrewChange,
    /// Held by customs inspection.
    CustomsDelay,
}

impl DelayReason {
    /// Every reason, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::PortCongestion,
        Self::WeatherConditions,
        Self::MechanicalIssues,
        Self::CrewChange,
        Self::CustomsDelay,
    ];
}

impl std::fmt::Display for DelayReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PortCongestion => write!(f, "Port Congestion"),
            Self::WeatherConditions => write!(f, "Weather Conditions"),
            Self::MechanicalIssues => write!(f, "Mechanical Issues"),
            Self::CrewChange => write!(f, "Crew Change"),
            Self::CustomsDelay => write!(f, "Customs Delay"),
        }
    }
}

/// A single simulated vessel shipment.
///
/// Records are created wholesale by the generator and never modified
/// afterwards. `is_delayed`, a nonzero `delay_minutes` and a present
/// `delay_reason` always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Identifier of the form `SH1001`, unique within a batch.
    pub shipment_id: String,

    /// Name of the carrying vessel.
    pub vessel_name: String,

    /// Current vessel status.
    pub status: VesselStatus,

    /// Trade corridor the shipment travels along.
    pub route: String,

    /// When the shipment was booked.
    pub created_at: DateTime<Utc>,

    /// Estimated time of arrival.
    pub eta: DateTime<Utc>,

    /// Whether the shipment is running late.
    pub is_delayed: bool,

    /// Accumulated delay; zero unless delayed.
    pub delay_minutes: u32,

    /// Cause of the delay, if any.
    pub delay_reason: Option<DelayReason>,

    /// Current latitude in degrees.
    pub current_lat: f64,

    /// Current longitude in degrees.
    pub current_lon: f64,

    /// Number of containers aboard.
    pub containers_count: u32,

    /// Cargo weight in kilograms.
    pub weight_kg: u32,
}

impl ShipmentRecord {
    /// Check whether the delay fields agree with each other.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.is_delayed == (self.delay_minutes > 0)
            && self.is_delayed == self.delay_reason.is_some()
    }

    /// Check whether `query` names this shipment.
    ///
    /// Surrounding whitespace is ignored and the comparison is
    /// case-insensitive, so `" sh1001 "` matches `SH1001`.
    #[must_use]
    pub fn matches_id(&self, query: &str) -> bool {
        self.shipment_id.eq_ignore_ascii_case(query.trim())
    }

    /// Whether the route runs through the Asia corridor.
    #[must_use]
    pub fn is_asia_route(&self) -> bool {
        self.route.contains(ASIA_CORRIDOR)
    }
}

/// Format the shipment ID for the given 1-based sequence number.
#[must_use]
pub fn shipment_id_for(sequence: u32) -> String {
    format!("SH{}", SHIPMENT_ID_OFFSET + sequence)
}
