//! Catalog optimizer types: goals, ranked solutions, search statistics

use serde::{Deserialize, Serialize};

use super::LifeHours;

/// Objective used to rank candidate configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationGoal {
    /// Lowest annual operating cost first
    #[default]
    Cost,
    /// Longest weakest-bearing life first
    Life,
    /// Highest transmission efficiency first
    Efficiency,
}

impl std::fmt::Display for OptimizationGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationGoal::Cost => write!(f, "cost"),
            OptimizationGoal::Life => write!(f, "life"),
            OptimizationGoal::Efficiency => write!(f, "efficiency"),
        }
    }
}

impl std::str::FromStr for OptimizationGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(OptimizationGoal::Cost),
            "life" => Ok(OptimizationGoal::Life),
            "efficiency" => Ok(OptimizationGoal::Efficiency),
            other => Err(format!(
                "unknown optimization goal '{other}' (expected cost, life or efficiency)"
            )),
        }
    }
}

/// One ranked catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// 1-based position in the ranking
    pub rank: usize,
    /// Human-readable summary of the chosen parts
    pub config_label: String,
    pub driving_diameter_mm: f64,
    pub driven_diameter_mm: f64,
    pub bearing_models: [String; 2],
    /// Annual operating cost
    pub cost: f64,
    /// Transmission efficiency (%)
    pub efficiency: f64,
    /// Weakest bearing L10h across the candidate
    pub min_bearing_life: LifeHours,
}

/// Reasons the optimizer may return no solutions without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationSkipReason {
    /// Base system lacks a motor or one of the pulleys
    IncompleteBaseSystem,
    /// Base system has fewer than two bearings to substitute
    MissingBearingSlots,
}

impl std::fmt::Display for OptimizationSkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteBaseSystem => write!(f, "IncompleteBaseSystem"),
            Self::MissingBearingSlots => write!(f, "MissingBearingSlots"),
        }
    }
}

/// Counters describing one optimization run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Size of the full Cartesian product
    pub total_combinations: u64,
    /// Combinations kept after the candidate cap
    pub enumerated: usize,
    /// Candidates actually analyzed (less than `enumerated` when cancelled)
    pub evaluated: usize,
    /// Candidates rejected by analyzer validation
    pub degenerate: usize,
    /// True when the cap cut the product short
    pub truncated: bool,
    /// True when the run stopped early on cancellation or deadline
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

/// Optimizer output: ranked shortlist plus run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub goal: OptimizationGoal,
    pub limit: usize,
    pub solutions: Vec<Solution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<OptimizationSkipReason>,
    pub stats: SearchStats,
}

impl OptimizationOutcome {
    /// Empty outcome for a base system the optimizer cannot work with.
    pub fn skipped(goal: OptimizationGoal, limit: usize, reason: OptimizationSkipReason) -> Self {
        Self {
            goal,
            limit,
            solutions: Vec::new(),
            skipped: Some(reason),
            stats: SearchStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_from_str() {
        assert_eq!("cost".parse::<OptimizationGoal>(), Ok(OptimizationGoal::Cost));
        assert_eq!(" Life ".parse::<OptimizationGoal>(), Ok(OptimizationGoal::Life));
        assert_eq!(
            "EFFICIENCY".parse::<OptimizationGoal>(),
            Ok(OptimizationGoal::Efficiency)
        );
        assert!("speed".parse::<OptimizationGoal>().is_err());
    }

    #[test]
    fn test_goal_serde_lowercase() {
        let g: OptimizationGoal = serde_json::from_str("\"life\"").unwrap();
        assert_eq!(g, OptimizationGoal::Life);
        assert_eq!(serde_json::to_value(OptimizationGoal::Efficiency).unwrap(), "efficiency");
    }
}
