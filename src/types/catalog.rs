//! Catalog reference data: commercial pulley diameters and bearing specs

use serde::{Deserialize, Serialize};

use super::BearingType;

/// A purchasable bearing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingSpec {
    pub model: String,
    pub bearing_type: BearingType,
    /// Basic dynamic load rating C (N)
    #[serde(alias = "dynamic_load_rating")]
    pub dynamic_load_c: f64,
}

impl BearingSpec {
    pub fn new(model: impl Into<String>, bearing_type: BearingType, dynamic_load_c: f64) -> Self {
        Self {
            model: model.into(),
            bearing_type,
            dynamic_load_c,
        }
    }
}

/// Immutable snapshot of the parts the optimizer may choose from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Commercial pitch diameters (mm), ascending
    #[serde(default)]
    pub pulley_diameters: Vec<f64>,
    #[serde(default)]
    pub bearings: Vec<BearingSpec>,
}

impl Catalog {
    pub fn new(pulley_diameters: Vec<f64>, bearings: Vec<BearingSpec>) -> Self {
        Self {
            pulley_diameters,
            bearings,
        }
    }
}
