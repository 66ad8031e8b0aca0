//! Analyzer output types

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::BearingType;

// ============================================================================
// Bearing Life
// ============================================================================

/// L10h bearing life in hours.
///
/// Three regimes matter to callers:
/// - finite positive: rated life
/// - infinite: bearing unloaded or shaft stopped
/// - zero: bearing data missing or malformed, life unknown
///
/// Infinite life serialises as the string `"infinite"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LifeHours(f64);

impl LifeHours {
    pub const INFINITE: LifeHours = LifeHours(f64::INFINITY);
    pub const UNKNOWN: LifeHours = LifeHours(0.0);

    pub fn new(hours: f64) -> Self {
        Self(hours)
    }

    pub fn hours(&self) -> f64 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite() && self.0 > 0.0
    }

    /// Rounded to 2 decimal places; infinity is preserved.
    pub fn rounded(&self) -> Self {
        if self.0.is_finite() {
            Self(crate::physics_engine::round2(self.0))
        } else {
            *self
        }
    }

    /// Total order (infinite sorts above every finite life).
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for LifeHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_infinite() {
            write!(f, "infinite")
        } else {
            write!(f, "{:.2} h", self.0)
        }
    }
}

impl Serialize for LifeHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_infinite() {
            serializer.serialize_str("infinite")
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

struct LifeHoursVisitor;

impl<'de> Visitor<'de> for LifeHoursVisitor {
    type Value = LifeHours;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a number of hours or the string \"infinite\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LifeHours, E> {
        Ok(LifeHours(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LifeHours, E> {
        Ok(LifeHours(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LifeHours, E> {
        Ok(LifeHours(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LifeHours, E> {
        match v {
            "infinite" | "inf" => Ok(LifeHours::INFINITE),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for LifeHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LifeHoursVisitor)
    }
}

// ============================================================================
// Result Sections
// ============================================================================

/// Kinematic and load summary of the drive
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemSummary {
    /// d_driven / d_driving
    pub transmission_ratio: f64,
    /// Driven shaft speed (rpm)
    pub output_rpm: f64,
    /// Motor shaft torque (N·m)
    pub motor_torque_nm: f64,
    /// Tangential belt force at the driving pulley (N)
    pub tangential_force_n: f64,
    /// Total radial shaft load from belt tension (N)
    pub radial_load_n: f64,
    /// Power delivered past the belt (kW)
    pub output_power_kw: f64,
}

/// Energy use and running cost projection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyFinance {
    pub transmission_efficiency_percent: f64,
    pub power_lost_kw: f64,
    pub annual_energy_kwh: f64,
    pub annual_cost: f64,
}

/// Belt geometry, reported when the shaft center distance is known
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeltDriveGeometry {
    pub transmission_ratio: f64,
    /// Driven speed including belt slip (rpm)
    pub driven_rpm: f64,
    pub belt_length_mm: f64,
    pub belt_speed_mps: f64,
    /// Wrap angle on the driving pulley (degrees)
    pub contact_arc_deg: f64,
}

/// Life estimate for one bearing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingResult {
    pub bearing_type: Option<BearingType>,
    pub model: String,
    /// Share of the radial load carried by this bearing (N)
    pub radial_load_n: f64,
    pub l10h: LifeHours,
}

/// Full analyzer output.
///
/// Bearing entries are flattened next to the fixed sections, keyed by
/// component id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub system: SystemSummary,
    pub energy_finance: EnergyFinance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belt_drive: Option<BeltDriveGeometry>,
    #[serde(flatten)]
    pub bearings: BTreeMap<String, BearingResult>,
}

/// Keys occupied by the fixed result sections; bearing ids may not use them.
pub const RESERVED_RESULT_KEYS: [&str; 3] = ["system", "energy_finance", "belt_drive"];

impl AnalysisResult {
    /// Weakest-link bearing life, `None` when the system has no bearings.
    pub fn min_bearing_life(&self) -> Option<LifeHours> {
        self.bearings
            .values()
            .map(|b| b.l10h)
            .min_by(|a, b| a.total_cmp(b))
    }
}
