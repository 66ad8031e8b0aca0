//! Sizer Configuration - formula constants and optimizer limits as TOML values
//!
//! Each struct implements `Default` with the canonical constants, so a
//! missing or empty config file reproduces the built-in behaviour exactly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::types::BeltType;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a sizer deployment.
///
/// Load with `SizerConfig::load()` which searches:
/// 1. `$SIZER_CONFIG` env var
/// 2. `./sizer_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizerConfig {
    /// Formula constants for the transmission analyzer
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// Catalog search limits
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Where the parts catalog comes from
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl SizerConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SIZER_CONFIG` environment variable
    /// 2. `./sizer_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded sizer config from SIZER_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SIZER_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SIZER_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./sizer_config.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded sizer config from ./sizer_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./sizer_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No sizer_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys only produce warnings; range violations are errors.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Sizer config saved");
        Ok(())
    }

    /// Validate all values.
    ///
    /// Rules:
    /// - Every factor and efficiency must be finite and positive
    /// - Efficiencies cannot exceed 1.0
    /// - Slip lies in [0, 1)
    /// - Candidate cap and default limit must be > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let p = &self.physics;

        if !p.flat_tension_factor.is_finite() || p.flat_tension_factor <= 0.0 {
            errors.push(format!(
                "physics.flat_tension_factor = {} must be > 0",
                p.flat_tension_factor
            ));
        }

        for (name, value) in [
            ("v", p.service_factors.v),
            ("synchronous", p.service_factors.synchronous),
            ("other", p.service_factors.other),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("physics.service_factors.{name} = {value} must be > 0"));
            }
        }

        for (name, value) in [
            ("v", p.efficiency.v),
            ("synchronous", p.efficiency.synchronous),
            ("flat", p.efficiency.flat),
            ("default", p.efficiency.default),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                errors.push(format!(
                    "physics.efficiency.{name} = {value} must be within (0, 1]"
                ));
            }
        }

        if !(0.0..1.0).contains(&p.v_belt_slip) {
            errors.push(format!(
                "physics.v_belt_slip = {} must be within [0, 1)",
                p.v_belt_slip
            ));
        }

        let o = &self.optimizer;
        if o.candidate_cap == 0 {
            errors.push("optimizer.candidate_cap must be > 0".to_string());
        }
        if o.default_limit == 0 {
            errors.push("optimizer.default_limit must be > 0".to_string());
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Physics Config
// ============================================================================

/// How the total radial shaft load is derived from the tangential force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensionModel {
    /// Multiply by a per-belt-type service factor
    #[default]
    ServiceFactor,
    /// Multiply by a single constant (`flat_tension_factor`)
    FlatFactor,
}

/// Formula constants for the transmission analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Belt tension model.
    #[serde(default)]
    pub tension_model: TensionModel,

    /// Constant tension multiplier for `tension_model = "flat_factor"`.
    #[serde(default = "default_flat_tension_factor")]
    pub flat_tension_factor: f64,

    /// Per-belt-type multipliers for `tension_model = "service_factor"`.
    #[serde(default)]
    pub service_factors: ServiceFactors,

    /// Belt transmission efficiency by belt type (fraction, 0-1).
    #[serde(default)]
    pub efficiency: EfficiencyTable,

    /// Operating days per year for the annual energy projection.
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,

    /// Fractional speed loss of V-belts, used by the belt geometry report.
    #[serde(default = "default_v_belt_slip")]
    pub v_belt_slip: f64,
}

fn default_flat_tension_factor() -> f64 { defaults::FLAT_TENSION_FACTOR }
fn default_days_per_year() -> f64 { defaults::DAYS_PER_YEAR }
fn default_v_belt_slip() -> f64 { defaults::V_BELT_SLIP }

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tension_model: TensionModel::default(),
            flat_tension_factor: default_flat_tension_factor(),
            service_factors: ServiceFactors::default(),
            efficiency: EfficiencyTable::default(),
            days_per_year: default_days_per_year(),
            v_belt_slip: default_v_belt_slip(),
        }
    }
}

/// Service factors applied to the tangential force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceFactors {
    #[serde(default = "default_sf_v")]
    pub v: f64,
    #[serde(default = "default_sf_synchronous")]
    pub synchronous: f64,
    /// Flat belts and unrecognised belt types
    #[serde(default = "default_sf_other")]
    pub other: f64,
}

fn default_sf_v() -> f64 { 1.5 }
fn default_sf_synchronous() -> f64 { 1.1 }
fn default_sf_other() -> f64 { 2.0 }

impl Default for ServiceFactors {
    fn default() -> Self {
        Self {
            v: default_sf_v(),
            synchronous: default_sf_synchronous(),
            other: default_sf_other(),
        }
    }
}

impl ServiceFactors {
    pub fn for_belt(&self, belt_type: BeltType) -> f64 {
        match belt_type {
            BeltType::V => self.v,
            BeltType::Synchronous => self.synchronous,
            BeltType::Flat | BeltType::Other => self.other,
        }
    }
}

/// Belt transmission efficiency lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyTable {
    #[serde(default = "default_eff_v")]
    pub v: f64,
    #[serde(default = "default_eff_synchronous")]
    pub synchronous: f64,
    #[serde(default = "default_eff_flat")]
    pub flat: f64,
    /// Unrecognised belt types
    #[serde(default = "default_eff_default")]
    pub default: f64,
}

fn default_eff_v() -> f64 { 0.95 }
fn default_eff_synchronous() -> f64 { 0.98 }
fn default_eff_flat() -> f64 { 0.97 }
fn default_eff_default() -> f64 { 0.96 }

impl Default for EfficiencyTable {
    fn default() -> Self {
        Self {
            v: default_eff_v(),
            synchronous: default_eff_synchronous(),
            flat: default_eff_flat(),
            default: default_eff_default(),
        }
    }
}

impl EfficiencyTable {
    pub fn for_belt(&self, belt_type: BeltType) -> f64 {
        match belt_type {
            BeltType::V => self.v,
            BeltType::Synchronous => self.synchronous,
            BeltType::Flat => self.flat,
            BeltType::Other => self.default,
        }
    }
}

// ============================================================================
// Optimizer Config
// ============================================================================

/// Catalog search limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum catalog combinations evaluated per run. The product is
    /// truncated in its deterministic enumeration order.
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: usize,

    /// Solutions returned when the caller does not specify a limit.
    #[serde(default = "default_solution_limit")]
    pub default_limit: usize,

    /// Wall-clock budget per run in milliseconds; 0 disables the deadline.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Evaluate candidates on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_candidate_cap() -> usize { defaults::CANDIDATE_CAP }
fn default_solution_limit() -> usize { defaults::SOLUTION_LIMIT }
fn default_timeout_ms() -> u64 { defaults::OPTIMIZE_TIMEOUT_MS }
fn default_parallel() -> bool { true }

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            candidate_cap: default_candidate_cap(),
            default_limit: default_solution_limit(),
            timeout_ms: default_timeout_ms(),
            parallel: default_parallel(),
        }
    }
}

impl OptimizerConfig {
    /// Deadline budget, `None` when disabled.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_ms > 0).then(|| std::time::Duration::from_millis(self.timeout_ms))
    }
}

// ============================================================================
// Catalog Config
// ============================================================================

/// Catalog source. Without a path the built-in commercial catalog is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML or JSON catalog file, re-read on every optimization run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Server Config
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `SIZER_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SizerConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: SizerConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.physics.tension_model, TensionModel::ServiceFactor);
        assert_eq!(config.physics.days_per_year, 365.0);
        assert_eq!(config.physics.service_factors.v, 1.5);
        assert_eq!(config.physics.efficiency.synchronous, 0.98);
        assert_eq!(config.optimizer.candidate_cap, 2000);
        assert_eq!(config.optimizer.default_limit, 5);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[physics]
tension_model = "flat_factor"
days_per_year = 260

[physics.efficiency]
v = 0.96
"#;
        let config = SizerConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.physics.tension_model, TensionModel::FlatFactor);
        assert_eq!(config.physics.days_per_year, 260.0);
        assert_eq!(config.physics.efficiency.v, 0.96);
        // Non-overridden values retain defaults
        assert_eq!(config.physics.efficiency.flat, 0.97);
        assert_eq!(config.physics.flat_tension_factor, 2.0);
        assert_eq!(config.optimizer.timeout_ms, 10_000);
    }

    #[test]
    fn test_validation_catches_efficiency_above_one() {
        let mut config = SizerConfig::default();
        config.physics.efficiency.flat = 1.2;
        let result = config.validate();
        assert!(result.is_err(), "Efficiency > 1 should fail validation");
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("efficiency.flat")));
        }
    }

    #[test]
    fn test_validation_catches_zero_cap() {
        let mut config = SizerConfig::default();
        config.optimizer.candidate_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_nan_factor() {
        let mut config = SizerConfig::default();
        config.physics.service_factors.synchronous = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let original = SizerConfig::default();
        let toml_str = original.to_toml().expect("serialization should work");
        let roundtripped: SizerConfig =
            toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(original.physics, roundtripped.physics);
        assert_eq!(original.optimizer, roundtripped.optimizer);
    }

    #[test]
    fn test_all_sections_serialize() {
        let toml_str = SizerConfig::default().to_toml().expect("serialization should work");
        assert!(toml_str.contains("[physics]"), "Missing [physics] section");
        assert!(toml_str.contains("[physics.service_factors]"), "Missing service_factors");
        assert!(toml_str.contains("[physics.efficiency]"), "Missing efficiency table");
        assert!(toml_str.contains("[optimizer]"), "Missing [optimizer] section");
        assert!(toml_str.contains("[server]"), "Missing [server] section");
    }

    #[test]
    fn test_factor_lookup_by_belt() {
        let sf = ServiceFactors::default();
        assert_eq!(sf.for_belt(BeltType::V), 1.5);
        assert_eq!(sf.for_belt(BeltType::Synchronous), 1.1);
        assert_eq!(sf.for_belt(BeltType::Flat), 2.0);
        assert_eq!(sf.for_belt(BeltType::Other), 2.0);

        let eff = EfficiencyTable::default();
        assert_eq!(eff.for_belt(BeltType::Flat), 0.97);
        assert_eq!(eff.for_belt(BeltType::Other), 0.96);
    }
}
