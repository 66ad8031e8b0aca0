//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for SizerConfig.
///
/// Maintained by hand to match the struct hierarchy in sizer_config.rs.
/// Any new field added to SizerConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [physics]
        "physics",
        "physics.tension_model",
        "physics.flat_tension_factor",
        "physics.days_per_year",
        "physics.v_belt_slip",
        // [physics.service_factors]
        "physics.service_factors",
        "physics.service_factors.v",
        "physics.service_factors.synchronous",
        "physics.service_factors.other",
        // [physics.efficiency]
        "physics.efficiency",
        "physics.efficiency.v",
        "physics.efficiency.synchronous",
        "physics.efficiency.flat",
        "physics.efficiency.default",
        // [optimizer]
        "optimizer",
        "optimizer.candidate_cap",
        "optimizer.default_limit",
        "optimizer.timeout_ms",
        "optimizer.parallel",
        // [catalog]
        "catalog",
        "catalog.path",
        // [server]
        "server",
        "server.addr",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let mut warnings = Vec::new();

    for key in walk_toml_keys(&value, "") {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(&key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key,
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed SizerConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::SizerConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let p = &config.physics;

    // A year has at most 366 operating days
    if !(p.days_per_year > 0.0 && p.days_per_year <= 366.0) {
        errors.push(format!(
            "physics.days_per_year = {:.1} is outside physical range (0-366 days)",
            p.days_per_year
        ));
    }

    // Belt service factors below 1.0 would shrink the shaft load below the belt pull
    for (name, value) in [
        ("v", p.service_factors.v),
        ("synchronous", p.service_factors.synchronous),
        ("other", p.service_factors.other),
    ] {
        if value.is_finite() && value > 0.0 && !(1.0..=3.0).contains(&value) {
            warnings.push(ValidationWarning {
                field: format!("physics.service_factors.{name}"),
                message: format!(
                    "service_factors.{name} = {value:.2} is outside typical range (1.0-3.0)"
                ),
                suggestion: None,
            });
        }
    }

    if p.flat_tension_factor.is_finite()
        && p.flat_tension_factor > 0.0
        && !(1.0..=3.0).contains(&p.flat_tension_factor)
    {
        warnings.push(ValidationWarning {
            field: "physics.flat_tension_factor".to_string(),
            message: format!(
                "flat_tension_factor = {:.2} is outside typical range (1.0-3.0)",
                p.flat_tension_factor
            ),
            suggestion: None,
        });
    }

    // Belt drives realistically transmit 80-99% of input power
    for (name, value) in [
        ("v", p.efficiency.v),
        ("synchronous", p.efficiency.synchronous),
        ("flat", p.efficiency.flat),
        ("default", p.efficiency.default),
    ] {
        if value > 0.0 && value < 0.8 {
            warnings.push(ValidationWarning {
                field: format!("physics.efficiency.{name}"),
                message: format!(
                    "efficiency.{name} = {value:.2} is below typical belt efficiency (0.80)"
                ),
                suggestion: None,
            });
        }
    }

    if p.v_belt_slip > 0.05 && p.v_belt_slip < 1.0 {
        warnings.push(ValidationWarning {
            field: "physics.v_belt_slip".to_string(),
            message: format!(
                "v_belt_slip = {:.3} is above typical V-belt slip (0-5%)",
                p.v_belt_slip
            ),
            suggestion: None,
        });
    }

    let o = &config.optimizer;
    if o.candidate_cap > 100_000 {
        warnings.push(ValidationWarning {
            field: "optimizer.candidate_cap".to_string(),
            message: format!(
                "candidate_cap = {} may make optimization requests very slow",
                o.candidate_cap
            ),
            suggestion: None,
        });
    }
    if o.default_limit > o.candidate_cap && o.candidate_cap > 0 {
        warnings.push(ValidationWarning {
            field: "optimizer.default_limit".to_string(),
            message: format!(
                "default_limit = {} exceeds candidate_cap = {}",
                o.default_limit, o.candidate_cap
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizerConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("efficency", "efficiency"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [physics]
            [physics.efficiency]
            flat = 0.97
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"physics".to_string()));
        assert!(keys.contains(&"physics.efficiency".to_string()));
        assert!(keys.contains(&"physics.efficiency.flat".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[optimizer]
candiate_cap = 500
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("candiate_cap"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("optimizer.candidate_cap")
        );
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[physics]
tension_model = "flat_factor"
days_per_year = 260

[physics.service_factors]
v = 1.4

[optimizer]
timeout_ms = 5000

[catalog]
path = "parts.toml"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let warnings = validate_unknown_keys("[motors]\nrpm = 1750\n");
        assert!(warnings.iter().any(|w| w.field == "motors"));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        let suggestion = suggest_correction("completely_unrelated_garbage_key_xyz", &known);
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_physical_range_defaults_clean() {
        let config = SizerConfig::default();
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty(), "Defaults should produce no errors: {:?}", errors);
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {:?}", warnings);
    }

    #[test]
    fn test_physical_range_days_per_year() {
        let mut config = SizerConfig::default();
        config.physics.days_per_year = 400.0;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("days_per_year")));

        config.physics.days_per_year = 0.0;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("days_per_year")));
    }

    #[test]
    fn test_physical_range_low_efficiency_warns() {
        let mut config = SizerConfig::default();
        config.physics.efficiency.v = 0.5;
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "physics.efficiency.v"));
    }

    #[test]
    fn test_physical_range_service_factor_below_one_warns() {
        let mut config = SizerConfig::default();
        config.physics.service_factors.synchronous = 0.5;
        let (_, warnings) = validate_physical_ranges(&config);
        assert!(warnings
            .iter()
            .any(|w| w.field == "physics.service_factors.synchronous"));
    }
}
