//! Catalog provider trait and implementations
//!
//! Abstracts where the optimizer's reference parts come from:
//! - `StaticCatalog`: in-memory catalog (built-in commercial sizes or caller supplied)
//! - `FileCatalog`: TOML or JSON file, re-read on every snapshot

mod file;
mod standard;

pub use file::FileCatalog;
pub use standard::StaticCatalog;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::CatalogConfig;
use crate::types::{BearingType, Catalog};

/// Trait for catalog backends
///
/// Implementations must be thread-safe (Send + Sync) since the HTTP
/// handlers share one provider across requests.
pub trait CatalogProvider: Send + Sync {
    /// Current catalog contents, validated
    fn snapshot(&self) -> Result<Catalog, CatalogError>;

    /// Provider name for logging
    fn source_name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog content no optimizer run can use
    #[error("malformed catalog: {0}")]
    Shape(String),
    #[error("catalog I/O error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog parse error ({}): {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("unsupported catalog format '{}' (expected .toml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Reject catalogs the optimizer cannot enumerate.
///
/// Rules:
/// - At least one pulley diameter and one bearing
/// - Diameters finite and > 0
/// - Every bearing has a model, a known type and a finite C > 0
pub fn validate_catalog(catalog: &Catalog) -> Result<(), CatalogError> {
    if catalog.pulley_diameters.is_empty() {
        return Err(CatalogError::Shape("no pulley diameters".to_string()));
    }
    if catalog.bearings.is_empty() {
        return Err(CatalogError::Shape("no bearings".to_string()));
    }

    if let Some(d) = catalog
        .pulley_diameters
        .iter()
        .find(|d| !(d.is_finite() && **d > 0.0))
    {
        return Err(CatalogError::Shape(format!(
            "pulley diameter {d} must be a positive number"
        )));
    }

    for (i, b) in catalog.bearings.iter().enumerate() {
        if b.model.trim().is_empty() {
            return Err(CatalogError::Shape(format!("bearing #{i} has no model")));
        }
        if b.bearing_type == BearingType::Unknown {
            return Err(CatalogError::Shape(format!(
                "bearing '{}' has an unknown bearing_type",
                b.model
            )));
        }
        if !(b.dynamic_load_c.is_finite() && b.dynamic_load_c > 0.0) {
            return Err(CatalogError::Shape(format!(
                "bearing '{}' has dynamic_load_c {} (must be > 0)",
                b.model, b.dynamic_load_c
            )));
        }
    }

    Ok(())
}

/// Provider selected by `[catalog]`: the file when a path is set, otherwise
/// the built-in commercial catalog.
pub fn provider_from_config(config: &CatalogConfig) -> Arc<dyn CatalogProvider> {
    match &config.path {
        Some(path) => {
            info!(path = %path.display(), "Using file catalog");
            Arc::new(FileCatalog::new(path.clone()))
        }
        None => {
            info!("Using built-in catalog");
            Arc::new(StaticCatalog::standard())
        }
    }
}
