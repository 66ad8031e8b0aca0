//! Open belt drive geometry: belt length, contact arc, slip-corrected speed

use thiserror::Error;

use super::round2;
use super::transmission::{belt_speed, transmission_ratio};
use crate::types::{BeltDriveGeometry, BeltType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error(
        "center distance {center_distance} mm is too small, pulleys of {d_driving} mm and {d_driven} mm overlap"
    )]
    Overlap {
        d_driving: f64,
        d_driven: f64,
        center_distance: f64,
    },
}

impl GeometryError {
    /// Input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            GeometryError::NonPositive { field, .. } => field,
            GeometryError::Overlap { .. } => "center_distance",
        }
    }
}

/// A validated two-pulley open belt drive.
#[derive(Debug, Clone, PartialEq)]
pub struct BeltDrive {
    d_driving: f64,
    d_driven: f64,
    rpm: f64,
    center_distance: f64,
    belt_type: BeltType,
}

impl BeltDrive {
    /// All dimensions in mm, speed in rpm.
    pub fn new(
        d_driving: f64,
        d_driven: f64,
        rpm: f64,
        center_distance: f64,
        belt_type: BeltType,
    ) -> Result<Self, GeometryError> {
        for (field, value) in [
            ("d_driving", d_driving),
            ("d_driven", d_driven),
            ("rpm", rpm),
            ("center_distance", center_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::NonPositive { field, value });
            }
        }
        if center_distance <= (d_driving + d_driven) / 2.0 {
            return Err(GeometryError::Overlap {
                d_driving,
                d_driven,
                center_distance,
            });
        }

        Ok(Self {
            d_driving,
            d_driven,
            rpm,
            center_distance,
            belt_type,
        })
    }

    pub fn ratio(&self) -> f64 {
        transmission_ratio(self.d_driving, self.d_driven)
    }

    /// Driven pulley speed; V belts lose `v_belt_slip` of the theoretical speed.
    pub fn driven_rpm(&self, v_belt_slip: f64) -> f64 {
        let theoretical = self.rpm / self.ratio();
        match self.belt_type {
            BeltType::V => theoretical * (1.0 - v_belt_slip),
            _ => theoretical,
        }
    }

    /// Open belt pitch length in mm: 2C + π(D+d)/2 + (D-d)²/4C
    pub fn belt_length(&self) -> f64 {
        let c = self.center_distance;
        2.0 * c
            + std::f64::consts::PI * (self.d_driven + self.d_driving) / 2.0
            + (self.d_driven - self.d_driving).powi(2) / (4.0 * c)
    }

    pub fn belt_speed(&self) -> f64 {
        belt_speed(self.d_driving, self.rpm)
    }

    /// Wrap angle on the driving pulley in degrees: below 180 when it is
    /// the smaller pulley, above 180 when it is the larger one. 0 when the
    /// geometry has no real solution.
    pub fn contact_arc(&self) -> f64 {
        let x = (self.d_driven - self.d_driving) / (2.0 * self.center_distance);
        if !(-1.0..=1.0).contains(&x) {
            return 0.0;
        }
        (std::f64::consts::PI - 2.0 * x.asin()).to_degrees()
    }

    /// Rounded report section.
    pub fn geometry(&self, v_belt_slip: f64) -> BeltDriveGeometry {
        BeltDriveGeometry {
            transmission_ratio: round2(self.ratio()),
            driven_rpm: round2(self.driven_rpm(v_belt_slip)),
            belt_length_mm: round2(self.belt_length()),
            belt_speed_mps: round2(self.belt_speed()),
            contact_arc_deg: round2(self.contact_arc()),
        }
    }
}
