//! Goal-specific ordering of evaluated candidates

use std::cmp::Ordering;

use super::enumeration::CandidateIndex;
use crate::types::{LifeHours, OptimizationGoal};

/// Metrics of one successfully analyzed candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Linear enumeration index, the final tie-break
    pub index: usize,
    pub choice: CandidateIndex,
    pub cost: f64,
    pub efficiency: f64,
    pub min_life: LifeHours,
}

fn cheaper(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    a.cost.total_cmp(&b.cost)
}

fn longer_lived(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.min_life.total_cmp(&a.min_life)
}

fn more_efficient(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.efficiency.total_cmp(&a.efficiency)
}

/// Full ordering for `goal`.
///
/// The goal metric leads; the remaining two follow in the fixed priority
/// cost, life, efficiency; enumeration index breaks exact ties.
pub fn compare(goal: OptimizationGoal, a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    let ordered = match goal {
        OptimizationGoal::Cost => cheaper(a, b)
            .then_with(|| longer_lived(a, b))
            .then_with(|| more_efficient(a, b)),
        OptimizationGoal::Life => longer_lived(a, b)
            .then_with(|| cheaper(a, b))
            .then_with(|| more_efficient(a, b)),
        OptimizationGoal::Efficiency => more_efficient(a, b)
            .then_with(|| cheaper(a, b))
            .then_with(|| longer_lived(a, b)),
    };
    ordered.then_with(|| a.index.cmp(&b.index))
}

/// Sort best-first and keep the top `limit`.
pub fn rank(mut candidates: Vec<ScoredCandidate>, goal: OptimizationGoal, limit: usize) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| compare(goal, a, b));
    candidates.truncate(limit);
    candidates
}
