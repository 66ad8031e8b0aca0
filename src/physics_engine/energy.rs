//! Transmission efficiency and annual energy/cost projection

use crate::config::PhysicsConfig;
use crate::types::{BeltType, MotorData};

/// Power flow through the belt and its yearly cost, in full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    /// Belt efficiency as a fraction (0-1)
    pub efficiency: f64,
    pub output_power_kw: f64,
    pub power_lost_kw: f64,
    pub annual_energy_kwh: f64,
    pub annual_cost: f64,
}

/// Project the energy balance of a motor driving a belt of `belt_type`.
///
/// Annual energy is drawn at the motor terminals:
/// `P / (motor_eff / 100) × hours/day × days/year`.
pub fn energy_balance(motor: &MotorData, belt_type: BeltType, physics: &PhysicsConfig) -> EnergyBalance {
    let efficiency = physics.efficiency.for_belt(belt_type);
    let output_power_kw = motor.power_kw * efficiency;
    let electrical_kw = motor.power_kw / (motor.efficiency / 100.0);
    let annual_energy_kwh = electrical_kw * motor.operating_hours * physics.days_per_year;

    EnergyBalance {
        efficiency,
        output_power_kw,
        power_lost_kw: motor.power_kw - output_power_kw,
        annual_energy_kwh,
        annual_cost: annual_energy_kwh * motor.cost_per_kwh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v_belt_defaults() {
        let motor = MotorData::new(1750.0, 5.0);
        let e = energy_balance(&motor, BeltType::V, &PhysicsConfig::default());
        assert_eq!(e.efficiency, 0.95);
        assert!((e.output_power_kw - 4.75).abs() < 1e-9);
        assert!((e.power_lost_kw - 0.25).abs() < 1e-9);
        // 5 / 0.95 × 8 × 365 = 15368.42 kWh
        assert!((e.annual_energy_kwh - 15_368.421).abs() < 0.01);
        assert!((e.annual_cost - 11_526.316).abs() < 0.01);
    }

    #[test]
    fn test_days_per_year_is_configurable() {
        let motor = MotorData::new(1750.0, 5.0);
        let mut physics = PhysicsConfig::default();
        physics.days_per_year = 260.0;
        let e = energy_balance(&motor, BeltType::Synchronous, &physics);
        assert_eq!(e.efficiency, 0.98);
        assert!((e.annual_energy_kwh - 5.0 / 0.95 * 8.0 * 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_power_costs_nothing() {
        let motor = MotorData::new(1750.0, 0.0);
        let e = energy_balance(&motor, BeltType::Flat, &PhysicsConfig::default());
        assert_eq!(e.output_power_kw, 0.0);
        assert_eq!(e.power_lost_kw, 0.0);
        assert_eq!(e.annual_cost, 0.0);
    }
}
