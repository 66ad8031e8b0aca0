//! ISO 281 basic rating life (L10h) for the shaft bearings

use crate::config::defaults;
use crate::types::{BearingData, BearingType, LifeHours};

/// Life exponent `p`: 3 for ball bearings, 10/3 for roller bearings.
pub fn life_exponent(bearing_type: BearingType) -> Option<f64> {
    match bearing_type {
        BearingType::Balls => Some(defaults::BALL_LIFE_EXPONENT),
        BearingType::Rollers => Some(defaults::ROLLER_LIFE_EXPONENT),
        BearingType::Unknown => None,
    }
}

/// L10h = (10^6 / (60·n)) · (C/P)^p
///
/// An unloaded or stationary bearing never reaches its rating life, so
/// `load <= 0` or `rpm <= 0` gives infinite life.
pub fn l10_life_hours(rpm: f64, load: f64, rating: f64, exponent: f64) -> LifeHours {
    if load <= 0.0 || rpm <= 0.0 {
        return LifeHours::INFINITE;
    }
    let hours = (defaults::L10_CYCLES / (60.0 * rpm)) * (rating / load).powf(exponent);
    LifeHours::new(hours)
}

/// Life of a bearing component as described by the caller.
///
/// Missing or malformed data (absent or unknown type, absent, non-positive
/// or non-finite C) yields `LifeHours::UNKNOWN` (0 h) so the weakest-link
/// minimum flags the bearing instead of hiding it.
pub fn bearing_life(data: &BearingData, output_rpm: f64, load_n: f64) -> LifeHours {
    let Some(exponent) = data.bearing_type.and_then(life_exponent) else {
        return LifeHours::UNKNOWN;
    };
    let rating = match data.dynamic_load_c {
        Some(c) if c.is_finite() && c > 0.0 => c,
        _ => return LifeHours::UNKNOWN,
    };
    l10_life_hours(output_rpm, load_n, rating, exponent)
}
