//! Kinematics and shaft loading of a two-pulley belt drive
//!
//! Every function follows the zero-propagation rule: a zero divisor yields
//! 0 rather than an error or a non-finite value.

use std::f64::consts::PI;

use crate::config::{defaults, PhysicsConfig, TensionModel};
use crate::types::BeltType;

/// Speed ratio `d_driven / d_driving`, 0 when the driving diameter is 0.
pub fn transmission_ratio(d_driving: f64, d_driven: f64) -> f64 {
    if d_driving == 0.0 {
        return 0.0;
    }
    d_driven / d_driving
}

/// Driven shaft speed in rpm, 0 when the ratio is 0.
pub fn output_rpm(input_rpm: f64, ratio: f64) -> f64 {
    if ratio == 0.0 {
        return 0.0;
    }
    input_rpm / ratio
}

/// Belt surface speed in m/s for a pulley of `diameter_mm` at `rpm`.
pub fn belt_speed(diameter_mm: f64, rpm: f64) -> f64 {
    PI * diameter_mm * rpm / defaults::BELT_SPEED_DIVISOR
}

/// Motor shaft torque in N·m from power in kW.
///
/// T = P·60 / (2π·n), 0 at standstill.
pub fn motor_torque(power_kw: f64, rpm: f64) -> f64 {
    if rpm == 0.0 {
        return 0.0;
    }
    (power_kw * 1000.0 * 60.0) / (2.0 * PI * rpm)
}

/// Belt pull in N at the driving pulley rim: torque over radius in metres.
pub fn tangential_force(torque_nm: f64, d_driving_mm: f64) -> f64 {
    if d_driving_mm == 0.0 {
        return 0.0;
    }
    torque_nm / (d_driving_mm / 2000.0)
}

/// Total radial load on the shafts under the configured tension model.
pub fn radial_load(tangential_force_n: f64, belt_type: BeltType, physics: &PhysicsConfig) -> f64 {
    let factor = match physics.tension_model {
        TensionModel::ServiceFactor => physics.service_factors.for_belt(belt_type),
        TensionModel::FlatFactor => physics.flat_tension_factor,
    };
    tangential_force_n * factor
}

/// Even split of the radial load across `bearing_count` bearings.
pub fn load_per_bearing(radial_load_n: f64, bearing_count: usize) -> f64 {
    if bearing_count == 0 {
        return 0.0;
    }
    radial_load_n / bearing_count as f64
}
