//! System-wide default constants.
//!
//! Centralises the numbers the sizing formulas and the optimizer fall back
//! to when no `sizer_config.toml` overrides them. Grouped by subsystem.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SIZER_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sizer_config.toml";

// ============================================================================
// Motor Defaults
// ============================================================================

/// Motor efficiency when the system description omits it (%).
pub const MOTOR_EFFICIENCY_PERCENT: f64 = 95.0;

/// Energy tariff when omitted (currency per kWh).
pub const COST_PER_KWH: f64 = 0.75;

/// Duty cycle when omitted (hours per day).
pub const OPERATING_HOURS_PER_DAY: f64 = 8.0;

// ============================================================================
// Physics
// ============================================================================

/// Operating days per year for the annual energy projection.
///
/// Some deployments count working days only (260); the default counts
/// the full calendar year.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Belt tension multiplier used by the flat-factor tension model.
pub const FLAT_TENSION_FACTOR: f64 = 2.0;

/// Speed loss applied to V-belt drives in the belt geometry calculation.
pub const V_BELT_SLIP: f64 = 0.015;

/// Conversion from mm·rpm to m/s for belt speed (60 s × 1000 mm).
pub const BELT_SPEED_DIVISOR: f64 = 60_000.0;

/// Cycles-per-million basis of the ISO 281 rating life.
pub const L10_CYCLES: f64 = 1_000_000.0;

/// ISO 281 life exponent for ball bearings.
pub const BALL_LIFE_EXPONENT: f64 = 3.0;

/// ISO 281 life exponent for roller bearings.
pub const ROLLER_LIFE_EXPONENT: f64 = 10.0 / 3.0;

// ============================================================================
// Optimizer
// ============================================================================

/// Hard ceiling on enumerated catalog combinations per run.
pub const CANDIDATE_CAP: usize = 2_000;

/// Solutions returned when the caller does not ask for a specific count.
pub const SOLUTION_LIMIT: usize = 5;

/// Wall-clock budget for a single optimization run (ms).
pub const OPTIMIZE_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// Server
// ============================================================================

/// HTTP bind address.
pub const SERVER_ADDR: &str = "127.0.0.1:8080";
