//! Catalog Optimization Engine
//!
//! Substitutes catalog pulley diameters and bearings into a base system,
//! re-runs the transmission analyzer for every combination and ranks the
//! results by cost, bearing life or efficiency. Entirely deterministic: the
//! same base system, catalog and goal always yield the same ranking.

mod enumeration;
mod optimizer;
mod ranking;

pub use enumeration::{CandidateIndex, CandidateSpace};
pub use optimizer::{CatalogOptimizer, SearchControl};
pub use ranking::{compare, rank, ScoredCandidate};
