//! Transmission Sizer: belt-and-pulley drive analysis and catalog optimization
//!
//! ## Architecture
//!
//! - **Physics Engine**: speed ratio, torque, belt pull, shaft load, ISO 281
//!   bearing life, energy and cost projection, belt geometry
//! - **Catalog**: stock pulley diameters and bearings, in memory or from file
//! - **Optimization**: brute-force catalog substitution ranked by cost, life
//!   or efficiency
//! - **API**: axum endpoints over the analyzer and the optimizer

pub mod api;
pub mod catalog;
pub mod config;
pub mod optimization;
pub mod physics_engine;
pub mod types;

// Re-export configuration
pub use config::SizerConfig;

// Re-export the sizing core
pub use catalog::{CatalogError, CatalogProvider, FileCatalog, StaticCatalog};
pub use optimization::{CatalogOptimizer, SearchControl};
pub use physics_engine::{AnalysisError, BeltDrive, TransmissionAnalyzer};

// Re-export commonly used types
pub use types::{
    AnalysisResult, BearingData, BearingSpec, BearingType, BeltType, Catalog, Component,
    ComponentSpec, LifeHours, MotorData, OptimizationGoal, OptimizationOutcome, PulleyData,
    Solution, System,
};
