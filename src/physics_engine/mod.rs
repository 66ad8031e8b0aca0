//! Physics Engine Module
//!
//! Deterministic calculations for belt-and-pulley transmission sizing.
//! All math here is closed-form mechanics, single pass, no iteration.
//!
//! ## Pipeline
//! - `transmission` - ratio, output speed, torque, belt pull, shaft load
//! - `bearings` - ISO 281 L10h rating life per bearing
//! - `energy` - belt efficiency, power loss, annual energy and cost
//! - `belt_drive` - belt length, contact arc, slip (when a center distance is given)
//!
//! `TransmissionAnalyzer::analyze()` validates a `System`, runs the pipeline
//! and rounds every reported value to 2 decimal places.

pub mod bearings;
pub mod belt_drive;
pub mod energy;
pub mod transmission;

pub use bearings::{bearing_life, l10_life_hours, life_exponent};
pub use belt_drive::{BeltDrive, GeometryError};
pub use energy::{energy_balance, EnergyBalance};
pub use transmission::{
    belt_speed, load_per_bearing, motor_torque, output_rpm, radial_load, tangential_force,
    transmission_ratio,
};

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::config::PhysicsConfig;
use crate::types::{
    AnalysisResult, BearingResult, ComponentRole, ComponentSpec, EnergyFinance, MotorData,
    PulleyData, System, SystemSummary, RESERVED_RESULT_KEYS,
};

/// Round to 2 decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A required drive-train role is missing or unusable
    #[error("incomplete system: {role} {reason}")]
    IncompleteSystem {
        role: ComponentRole,
        reason: &'static str,
    },
    /// A component carries values no physical drive can have
    #[error("invalid data in component '{id}': {field} {reason}")]
    InvalidComponentData {
        id: String,
        field: &'static str,
        reason: String,
    },
}

impl AnalysisError {
    fn invalid(id: &str, field: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidComponentData {
            id: id.to_string(),
            field,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Stateless transmission analyzer parameterised by the physics constants.
#[derive(Debug, Clone, Default)]
pub struct TransmissionAnalyzer {
    physics: PhysicsConfig,
}

/// Required parts of a system after validation
struct DriveTrain<'a> {
    motor: &'a MotorData,
    driving_id: &'a str,
    driving: &'a PulleyData,
    driven: &'a PulleyData,
}

impl TransmissionAnalyzer {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self { physics }
    }

    /// Analyzer using the global `[physics]` configuration.
    pub fn from_global() -> Self {
        Self::new(crate::config::get().physics.clone())
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Run the full analysis pipeline on `system`.
    pub fn analyze(&self, system: &System) -> Result<AnalysisResult, AnalysisError> {
        let drive = self.validate(system)?;
        let belt_type = drive.driving.belt_type;
        let motor = drive.motor;

        // Kinematics and loading
        let ratio = transmission_ratio(drive.driving.diameter, drive.driven.diameter);
        let n_out = output_rpm(motor.rpm, ratio);
        let torque = motor_torque(motor.power_kw, motor.rpm);
        let force = tangential_force(torque, drive.driving.diameter);
        let total_load = radial_load(force, belt_type, &self.physics);

        // Bearings
        let bearing_count = system.bearings().count();
        let per_bearing = load_per_bearing(total_load, bearing_count);
        let bearings: BTreeMap<String, BearingResult> = system
            .bearings()
            .map(|(id, data)| {
                let life = bearing_life(data, n_out, per_bearing);
                (
                    id.to_string(),
                    BearingResult {
                        bearing_type: data.bearing_type,
                        model: data.model.clone(),
                        radial_load_n: round2(per_bearing),
                        l10h: life.rounded(),
                    },
                )
            })
            .collect();

        // Energy and cost
        let energy = energy_balance(motor, belt_type, &self.physics);

        // Optional belt geometry; a zero driving diameter or a stationary
        // motor propagates zeros instead of failing the geometry checks
        let belt_drive = match drive.driving.center_distance {
            Some(_) if drive.driving.diameter == 0.0 || motor.rpm == 0.0 => None,
            Some(c) => {
                let geometry = BeltDrive::new(
                    drive.driving.diameter,
                    drive.driven.diameter,
                    motor.rpm,
                    c,
                    belt_type,
                )
                .map_err(|e| AnalysisError::invalid(drive.driving_id, e.field(), e.to_string()))?;
                Some(geometry.geometry(self.physics.v_belt_slip))
            }
            None => None,
        };

        debug!(
            ratio,
            output_rpm = n_out,
            radial_load_n = total_load,
            bearings = bearing_count,
            "Transmission analyzed"
        );

        Ok(AnalysisResult {
            system: SystemSummary {
                transmission_ratio: round2(ratio),
                output_rpm: round2(n_out),
                motor_torque_nm: round2(torque),
                tangential_force_n: round2(force),
                radial_load_n: round2(total_load),
                output_power_kw: round2(energy.output_power_kw),
            },
            energy_finance: EnergyFinance {
                transmission_efficiency_percent: round2(energy.efficiency * 100.0),
                power_lost_kw: round2(energy.power_lost_kw),
                annual_energy_kwh: round2(energy.annual_energy_kwh),
                annual_cost: round2(energy.annual_cost),
            },
            belt_drive,
            bearings,
        })
    }

    /// Structural and range checks. Zero rpm, power and driving diameter
    /// pass: they propagate as zeros through the pipeline.
    fn validate<'a>(&self, system: &'a System) -> Result<DriveTrain<'a>, AnalysisError> {
        let mut seen = HashSet::new();
        for c in &system.components {
            if !seen.insert(c.id.as_str()) {
                return Err(AnalysisError::invalid(&c.id, "id", "is used by more than one component"));
            }
            if c.role() == Some(ComponentRole::Bearing) && RESERVED_RESULT_KEYS.contains(&c.id.as_str()) {
                return Err(AnalysisError::invalid(&c.id, "id", "is reserved for a result section"));
            }
        }

        // Presence and uniqueness of every required role before any range check
        let (motor_id, motor) = single(system, ComponentRole::Motor, |spec| match spec {
            ComponentSpec::Motor(m) => Some(m),
            _ => None,
        })?;
        let (driving_id, driving) = single(system, ComponentRole::DrivingPulley, |spec| match spec {
            ComponentSpec::DrivingPulley(p) => Some(p),
            _ => None,
        })?;
        let (driven_id, driven) = single(system, ComponentRole::DrivenPulley, |spec| match spec {
            ComponentSpec::DrivenPulley(p) => Some(p),
            _ => None,
        })?;

        validate_motor(motor_id, motor)?;
        validate_pulley(driving_id, driving)?;
        validate_pulley(driven_id, driven)?;

        if driven.diameter == 0.0 {
            return Err(AnalysisError::IncompleteSystem {
                role: ComponentRole::DrivenPulley,
                reason: "has zero diameter",
            });
        }

        Ok(DriveTrain {
            motor,
            driving_id,
            driving,
            driven,
        })
    }
}

/// The one component holding `role`, with its id.
fn single<'a, T>(
    system: &'a System,
    role: ComponentRole,
    data: impl Fn(&'a ComponentSpec) -> Option<&'a T>,
) -> Result<(&'a str, &'a T), AnalysisError> {
    let mut found = system
        .components
        .iter()
        .filter_map(|c| data(&c.spec).map(|d| (c.id.as_str(), d)));
    let first = found.next().ok_or(AnalysisError::IncompleteSystem {
        role,
        reason: "is missing",
    })?;
    if let Some((extra_id, _)) = found.next() {
        return Err(AnalysisError::invalid(
            extra_id,
            "type",
            format!("a system takes exactly one {role}"),
        ));
    }
    Ok(first)
}

fn non_negative(id: &str, field: &'static str, value: f64) -> Result<(), AnalysisError> {
    if value.is_nan() {
        return Err(AnalysisError::invalid(id, field, "is not a number"));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(AnalysisError::invalid(id, field, format!("must be a finite value >= 0, got {value}")));
    }
    Ok(())
}

fn validate_motor(id: &str, m: &MotorData) -> Result<(), AnalysisError> {
    non_negative(id, "rpm", m.rpm)?;
    non_negative(id, "power_kw", m.power_kw)?;
    non_negative(id, "cost_per_kwh", m.cost_per_kwh)?;
    if !(m.efficiency > 0.0 && m.efficiency <= 100.0) {
        return Err(AnalysisError::invalid(
            id,
            "efficiency",
            format!("must be within (0, 100] %, got {}", m.efficiency),
        ));
    }
    if !(0.0..=24.0).contains(&m.operating_hours) {
        return Err(AnalysisError::invalid(
            id,
            "operating_hours",
            format!("must be within [0, 24] h/day, got {}", m.operating_hours),
        ));
    }
    Ok(())
}

fn validate_pulley(id: &str, p: &PulleyData) -> Result<(), AnalysisError> {
    non_negative(id, "diameter", p.diameter)?;
    if let Some(c) = p.center_distance {
        if !(c.is_finite() && c > 0.0) {
            return Err(AnalysisError::invalid(
                id,
                "center_distance",
                format!("must be a positive number, got {c}"),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BearingData, BearingType, BeltType, Component, LifeHours};
    use proptest::prelude::*;

    fn reference_system() -> System {
        System::default()
            .with(Component::motor("m1", MotorData::new(1750.0, 5.0)))
            .with(Component::driving_pulley("p1", PulleyData::new(100.0)))
            .with(Component::driven_pulley("p2", PulleyData::new(200.0)))
            .with(Component::bearing(
                "b1",
                BearingData::new("6205", BearingType::Balls, 10_000.0),
            ))
    }

    #[test]
    fn test_reference_scenario() {
        let result = TransmissionAnalyzer::default()
            .analyze(&reference_system())
            .unwrap();
        assert_eq!(result.system.transmission_ratio, 2.0);
        assert_eq!(result.system.output_rpm, 875.0);
        assert_eq!(result.system.motor_torque_nm, 27.28);
        assert_eq!(result.system.tangential_force_n, 545.67);
        assert_eq!(result.system.radial_load_n, 818.51);
        assert_eq!(result.system.output_power_kw, 4.75);
        assert_eq!(result.energy_finance.transmission_efficiency_percent, 95.0);
        assert_eq!(result.energy_finance.power_lost_kw, 0.25);

        let b1 = &result.bearings["b1"];
        assert_eq!(b1.model, "6205");
        assert_eq!(b1.radial_load_n, 818.51);
        assert!(b1.l10h.hours().is_finite() && b1.l10h.hours() > 0.0);
        assert!(result.belt_drive.is_none());
    }

    #[test]
    fn test_zero_driven_diameter_is_incomplete() {
        let mut system = reference_system();
        system.components[2] = Component::driven_pulley("p2", PulleyData::new(0.0));
        let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::IncompleteSystem {
                role: ComponentRole::DrivenPulley,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_motor_is_incomplete() {
        let mut system = reference_system();
        system.components.remove(0);
        let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::IncompleteSystem {
                role: ComponentRole::Motor,
                reason: "is missing"
            }
        );
    }

    #[test]
    fn test_missing_pulleys_report_their_own_role() {
        for (index, role) in [(1, ComponentRole::DrivingPulley), (2, ComponentRole::DrivenPulley)] {
            let mut system = reference_system();
            system.components.remove(index);
            let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
            assert_eq!(
                err,
                AnalysisError::IncompleteSystem {
                    role,
                    reason: "is missing"
                }
            );
        }
    }

    #[test]
    fn test_second_driven_pulley_rejected() {
        let system = reference_system().with(Component::driven_pulley("p3", PulleyData::new(250.0)));
        let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidComponentData { ref id, field: "type", .. } if id == "p3"
        ));
    }

    #[test]
    fn test_zero_driving_diameter_propagates_zeros() {
        let mut system = reference_system();
        system.components[1] = Component::driving_pulley("p1", PulleyData::new(0.0));
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        assert_eq!(result.system.transmission_ratio, 0.0);
        assert_eq!(result.system.output_rpm, 0.0);
        assert_eq!(result.system.tangential_force_n, 0.0);
        // Unloaded bearing on a stopped shaft
        assert!(result.bearings["b1"].l10h.is_infinite());
    }

    #[test]
    fn test_no_bearings_is_not_an_error() {
        let mut system = reference_system();
        system.components.truncate(3);
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        assert!(result.bearings.is_empty());
        assert!(result.min_bearing_life().is_none());
    }

    #[test]
    fn test_load_split_across_bearings() {
        let system = reference_system().with(Component::bearing(
            "b2",
            BearingData::new("NU205", BearingType::Rollers, 28_600.0),
        ));
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        assert_eq!(result.bearings["b1"].radial_load_n, 409.26);
        assert_eq!(result.bearings["b2"].radial_load_n, 409.26);
        assert!(result.bearings["b2"].l10h.hours() > result.bearings["b1"].l10h.hours());
    }

    #[test]
    fn test_malformed_bearing_reports_zero_life() {
        let system = reference_system().with(Component::bearing("b2", BearingData::default()));
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        assert_eq!(result.bearings["b2"].l10h, LifeHours::UNKNOWN);
        assert_eq!(result.min_bearing_life(), Some(LifeHours::UNKNOWN));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let system = reference_system().with(Component::bearing(
            "b1",
            BearingData::new("6206", BearingType::Balls, 19_500.0),
        ));
        let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidComponentData { ref id, field: "id", .. } if id == "b1"));
    }

    #[test]
    fn test_reserved_bearing_id_rejected() {
        let system = reference_system().with(Component::bearing(
            "system",
            BearingData::new("6206", BearingType::Balls, 19_500.0),
        ));
        assert!(TransmissionAnalyzer::default().analyze(&system).is_err());
    }

    #[test]
    fn test_second_motor_rejected() {
        let system = reference_system().with(Component::motor("m2", MotorData::new(1450.0, 3.0)));
        let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidComponentData { ref id, .. } if id == "m2"));
    }

    #[test]
    fn test_motor_range_checks() {
        let cases: [(fn(&mut MotorData), &str); 5] = [
            (|m| m.rpm = -1.0, "rpm"),
            (|m| m.power_kw = f64::NAN, "power_kw"),
            (|m| m.efficiency = 0.0, "efficiency"),
            (|m| m.operating_hours = 25.0, "operating_hours"),
            (|m| m.cost_per_kwh = -0.1, "cost_per_kwh"),
        ];
        for (mutate, expected) in cases {
            let mut motor = MotorData::new(1750.0, 5.0);
            mutate(&mut motor);
            let mut system = reference_system();
            system.components[0] = Component::motor("m1", motor);
            match TransmissionAnalyzer::default().analyze(&system) {
                Err(AnalysisError::InvalidComponentData { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidComponentData for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_center_distance_adds_belt_drive_section() {
        let mut system = reference_system();
        system.components[1] = Component::driving_pulley(
            "p1",
            PulleyData::new(100.0)
                .with_belt_type(BeltType::Synchronous)
                .with_center_distance(500.0),
        );
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        let belt = result.belt_drive.expect("belt_drive section");
        assert_eq!(belt.driven_rpm, 875.0);
        assert_eq!(belt.belt_length_mm, 1476.24);
        // Synchronous service factor: 545.67 × 1.1
        assert_eq!(result.system.radial_load_n, 600.24);
    }

    #[test]
    fn test_zero_inputs_with_center_distance_skip_belt_drive() {
        let mut system = reference_system();
        system.components[1] =
            Component::driving_pulley("p1", PulleyData::new(0.0).with_center_distance(500.0));
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        assert_eq!(result.system.output_rpm, 0.0);
        assert!(result.belt_drive.is_none());

        let mut system = reference_system();
        system.components[0] = Component::motor("m1", MotorData::new(0.0, 5.0));
        system.components[1] =
            Component::driving_pulley("p1", PulleyData::new(100.0).with_center_distance(500.0));
        let result = TransmissionAnalyzer::default().analyze(&system).unwrap();
        assert_eq!(result.system.motor_torque_nm, 0.0);
        assert!(result.belt_drive.is_none());
    }

    #[test]
    fn test_overlapping_center_distance_rejected() {
        let mut system = reference_system();
        system.components[1] =
            Component::driving_pulley("p1", PulleyData::new(100.0).with_center_distance(120.0));
        let err = TransmissionAnalyzer::default().analyze(&system).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidComponentData { ref id, field: "center_distance", .. } if id == "p1"
        ));
    }

    #[test]
    fn test_unknown_components_are_ignored() {
        let system = reference_system().with(Component::new(
            "g1",
            ComponentSpec::Other {
                kind: "gearbox".into(),
                data: serde_json::json!({"stages": 2}),
            },
        ));
        assert!(TransmissionAnalyzer::default().analyze(&system).is_ok());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = TransmissionAnalyzer::default();
        let a = serde_json::to_string(&analyzer.analyze(&reference_system()).unwrap()).unwrap();
        let b = serde_json::to_string(&analyzer.analyze(&reference_system()).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    fn drive(d_driving: f64, d_driven: f64, rpm: f64) -> System {
        System::default()
            .with(Component::motor("m1", MotorData::new(rpm, 5.0)))
            .with(Component::driving_pulley("p1", PulleyData::new(d_driving)))
            .with(Component::driven_pulley("p2", PulleyData::new(d_driven)))
    }

    proptest! {
        #[test]
        fn prop_output_rpm_times_ratio_is_input_rpm(
            d_driving in 20.0f64..1000.0,
            d_driven in 20.0f64..1000.0,
            rpm in 1.0f64..6000.0,
        ) {
            let result = TransmissionAnalyzer::default()
                .analyze(&drive(d_driving, d_driven, rpm))
                .unwrap();
            let ratio = result.system.transmission_ratio;
            let out = result.system.output_rpm;
            // Both factors are rounded to 2 dp
            let tolerance = 0.005 * (ratio + out) + 1e-4;
            prop_assert!((out * ratio - rpm).abs() <= tolerance, "{out} x {ratio} vs {rpm}");
        }

        #[test]
        fn prop_zero_ratio_means_zero_output(
            d_driven in 1.0f64..1000.0,
            rpm in 0.0f64..6000.0,
        ) {
            let result = TransmissionAnalyzer::default()
                .analyze(&drive(0.0, d_driven, rpm))
                .unwrap();
            prop_assert_eq!(result.system.transmission_ratio, 0.0);
            prop_assert_eq!(result.system.output_rpm, 0.0);
        }
    }
}
