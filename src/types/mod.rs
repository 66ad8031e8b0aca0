//! Shared data structures for transmission sizing
//!
//! - Component / System: drive train description submitted by callers
//! - AnalysisResult: analyzer output (summary, energy, belt geometry, bearing lives)
//! - Catalog / BearingSpec: reference parts the optimizer chooses from
//! - OptimizationGoal / Solution / OptimizationOutcome: optimizer output

mod analysis;
mod catalog;
mod component;
mod optimization;

pub use analysis::*;
pub use catalog::*;
pub use component::*;
pub use optimization::*;
