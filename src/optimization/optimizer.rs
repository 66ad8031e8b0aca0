//! Core CatalogOptimizer: brute-force search over catalog substitutions

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::enumeration::{CandidateIndex, CandidateSpace};
use super::ranking::{rank, ScoredCandidate};
use crate::catalog::{validate_catalog, CatalogError, CatalogProvider};
use crate::config::OptimizerConfig;
use crate::physics_engine::TransmissionAnalyzer;
use crate::types::{
    BearingData, Catalog, ComponentRole, ComponentSpec, OptimizationGoal, OptimizationOutcome,
    OptimizationSkipReason, SearchStats, Solution, System,
};

// ============================================================================
// Search Control
// ============================================================================

/// Stop conditions for a running search: external cancellation and an
/// optional wall-clock deadline.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
}

impl SearchControl {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Set the deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

// ============================================================================
// Slots
// ============================================================================

/// Positions in the base system that receive catalog values
#[derive(Debug, Clone, Copy)]
struct Slots {
    driving: usize,
    driven: usize,
    bearing_1: usize,
    bearing_2: usize,
}

impl Slots {
    /// Locate slots by role: first driving pulley, first driven pulley,
    /// first two bearings. A motor must also be present.
    fn locate(base: &System) -> Result<Self, OptimizationSkipReason> {
        let driving = base.position_of(ComponentRole::DrivingPulley);
        let driven = base.position_of(ComponentRole::DrivenPulley);
        let motor = base.position_of(ComponentRole::Motor);
        let (Some(driving), Some(driven), Some(_)) = (driving, driven, motor) else {
            return Err(OptimizationSkipReason::IncompleteBaseSystem);
        };

        let mut bearings = base
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role() == Some(ComponentRole::Bearing))
            .map(|(i, _)| i);
        let (Some(bearing_1), Some(bearing_2)) = (bearings.next(), bearings.next()) else {
            return Err(OptimizationSkipReason::MissingBearingSlots);
        };

        Ok(Self {
            driving,
            driven,
            bearing_1,
            bearing_2,
        })
    }
}

/// Replace a pulley's diameter, keeping belt type and center distance.
fn set_diameter(spec: &mut ComponentSpec, diameter: f64) {
    match spec {
        ComponentSpec::DrivingPulley(p) | ComponentSpec::DrivenPulley(p) => p.diameter = diameter,
        _ => {}
    }
}

// ============================================================================
// Optimizer
// ============================================================================

/// Enumerates catalog substitutions into a base system and ranks them.
pub struct CatalogOptimizer {
    analyzer: TransmissionAnalyzer,
    catalog: Arc<dyn CatalogProvider>,
    settings: OptimizerConfig,
}

impl CatalogOptimizer {
    pub fn new(
        analyzer: TransmissionAnalyzer,
        catalog: Arc<dyn CatalogProvider>,
        settings: OptimizerConfig,
    ) -> Self {
        Self {
            analyzer,
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &OptimizerConfig {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.catalog
    }

    /// Run with the configured timeout and no external cancellation.
    pub fn optimize(
        &self,
        base: &System,
        goal: OptimizationGoal,
        limit: Option<usize>,
    ) -> Result<OptimizationOutcome, CatalogError> {
        let mut control = SearchControl::default();
        if let Some(timeout) = self.settings.timeout() {
            control = control.with_timeout(timeout);
        }
        self.optimize_with(base, goal, limit, &control)
    }

    /// Run under an explicit `SearchControl`.
    ///
    /// Returns `Ok` with an empty, `skipped` outcome when the base system
    /// has no usable slots; only catalog failures are errors.
    pub fn optimize_with(
        &self,
        base: &System,
        goal: OptimizationGoal,
        limit: Option<usize>,
        control: &SearchControl,
    ) -> Result<OptimizationOutcome, CatalogError> {
        let limit = limit.unwrap_or(self.settings.default_limit);

        let slots = match Slots::locate(base) {
            Ok(slots) => slots,
            Err(reason) => {
                info!(%goal, %reason, "Optimization skipped");
                return Ok(OptimizationOutcome::skipped(goal, limit, reason));
            }
        };

        let catalog = self.catalog.snapshot()?;
        validate_catalog(&catalog)?;
        let started = Instant::now();
        let space = CandidateSpace::for_catalog(&catalog);
        let total = space.total();
        let enumerated = space.capped(self.settings.candidate_cap);
        if total > enumerated as u64 {
            warn!(
                total,
                cap = self.settings.candidate_cap,
                source = self.catalog.source_name(),
                "Catalog product exceeds candidate cap, truncating"
            );
        }

        let evaluated = AtomicUsize::new(0);
        let degenerate = AtomicUsize::new(0);
        let stopped = AtomicBool::new(false);

        let evaluate = |k: usize| -> Option<ScoredCandidate> {
            if control.is_stopped() {
                stopped.store(true, Ordering::Relaxed);
                return None;
            }
            let choice = space.decode(k);
            let candidate = substitute(base, &slots, &catalog, choice);
            evaluated.fetch_add(1, Ordering::Relaxed);

            match self.analyzer.analyze(&candidate) {
                Ok(result) => Some(ScoredCandidate {
                    index: k,
                    choice,
                    cost: result.energy_finance.annual_cost,
                    efficiency: result.energy_finance.transmission_efficiency_percent,
                    min_life: result.min_bearing_life()?,
                }),
                Err(e) => {
                    degenerate.fetch_add(1, Ordering::Relaxed);
                    debug!(index = k, error = %e, "Degenerate candidate dropped");
                    None
                }
            }
        };

        let scored: Vec<ScoredCandidate> = if self.settings.parallel {
            (0..enumerated).into_par_iter().filter_map(evaluate).collect()
        } else {
            (0..enumerated).filter_map(evaluate).collect()
        };

        let ranked = rank(scored, goal, limit);
        let solutions: Vec<Solution> = ranked
            .iter()
            .enumerate()
            .map(|(i, c)| to_solution(i + 1, c, &catalog))
            .collect();

        let stats = SearchStats {
            total_combinations: total,
            enumerated,
            evaluated: evaluated.into_inner(),
            degenerate: degenerate.into_inner(),
            truncated: total > enumerated as u64,
            cancelled: stopped.into_inner(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if stats.cancelled {
            warn!(
                evaluated = stats.evaluated,
                enumerated = stats.enumerated,
                "Optimization stopped early, returning partial results"
            );
        }
        info!(
            %goal,
            enumerated = stats.enumerated,
            evaluated = stats.evaluated,
            degenerate = stats.degenerate,
            solutions = solutions.len(),
            elapsed_ms = stats.elapsed_ms,
            "Optimization complete"
        );

        Ok(OptimizationOutcome {
            goal,
            limit,
            solutions,
            skipped: None,
            stats,
        })
    }
}

/// Clone `base` with the chosen catalog values written into its slots.
fn substitute(base: &System, slots: &Slots, catalog: &Catalog, choice: CandidateIndex) -> System {
    let mut candidate = base.clone();
    set_diameter(
        &mut candidate.components[slots.driving].spec,
        catalog.pulley_diameters[choice.driving],
    );
    set_diameter(
        &mut candidate.components[slots.driven].spec,
        catalog.pulley_diameters[choice.driven],
    );
    candidate.components[slots.bearing_1].spec =
        ComponentSpec::Bearing(BearingData::from(&catalog.bearings[choice.bearing_1]));
    candidate.components[slots.bearing_2].spec =
        ComponentSpec::Bearing(BearingData::from(&catalog.bearings[choice.bearing_2]));
    candidate
}

fn to_solution(rank: usize, c: &ScoredCandidate, catalog: &Catalog) -> Solution {
    let driving = catalog.pulley_diameters[c.choice.driving];
    let driven = catalog.pulley_diameters[c.choice.driven];
    let b1 = catalog.bearings[c.choice.bearing_1].model.clone();
    let b2 = catalog.bearings[c.choice.bearing_2].model.clone();
    Solution {
        rank,
        config_label: format!("Driving {driving} mm / Driven {driven} mm / Bearings {b1} + {b2}"),
        driving_diameter_mm: driving,
        driven_diameter_mm: driven,
        bearing_models: [b1, b2],
        cost: c.cost,
        efficiency: c.efficiency,
        min_bearing_life: c.min_life,
    }
}
