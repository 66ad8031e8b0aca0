//! Sizer Configuration Module
//!
//! Provides the tunable constants behind the transmission formulas and the
//! optimizer, loaded from TOML. Tension model, efficiency table and days per
//! year are all named values here rather than literals in code.
//!
//! ## Loading Order
//!
//! 1. `SIZER_CONFIG` environment variable (path to TOML file)
//! 2. `sizer_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! config::init(SizerConfig::load());
//! let days = config::get().physics.days_per_year;
//! ```

mod sizer_config;
pub mod defaults;
pub mod validation;

pub use sizer_config::*;

use std::sync::OnceLock;

/// Global sizer configuration, initialized once at startup.
static SIZER_CONFIG: OnceLock<SizerConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: SizerConfig) {
    if SIZER_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Falls back to the built-in defaults when `init()` has not been called.
pub fn get() -> &'static SizerConfig {
    SIZER_CONFIG.get_or_init(SizerConfig::default)
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    SIZER_CONFIG.get().is_some()
}
