//! API route handlers
//!
//! Thin glue between HTTP and the sizing core:
//! - Health and effective configuration
//! - Catalog snapshot
//! - Single-shot transmission analysis and belt geometry
//! - Catalog optimization (runs on the blocking pool)

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::catalog::{provider_from_config, CatalogError, CatalogProvider};
use crate::config::SizerConfig;
use crate::optimization::{CatalogOptimizer, SearchControl};
use crate::physics_engine::{AnalysisError, BeltDrive, TransmissionAnalyzer};
use crate::types::{BeltType, OptimizationGoal, System};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration, fixed for the life of the server
    pub config: Arc<SizerConfig>,
    pub analyzer: Arc<TransmissionAnalyzer>,
    pub optimizer: Arc<CatalogOptimizer>,
    /// Cancelled on server shutdown; running optimizations stop early
    pub shutdown: CancellationToken,
}

impl AppState {
    /// State with the catalog selected by `[catalog]`.
    pub fn new(config: SizerConfig) -> Self {
        let catalog = provider_from_config(&config.catalog);
        Self::with_catalog(config, catalog)
    }

    /// State with an explicit catalog provider.
    pub fn with_catalog(config: SizerConfig, catalog: Arc<dyn CatalogProvider>) -> Self {
        let analyzer = TransmissionAnalyzer::new(config.physics.clone());
        let optimizer = CatalogOptimizer::new(analyzer.clone(), catalog, config.optimizer.clone());
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
            optimizer: Arc::new(optimizer),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Body of `POST /optimize`
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub system: System,
    #[serde(default)]
    pub goal: OptimizationGoal,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Body of `POST /belt-drive`
#[derive(Debug, Deserialize)]
pub struct BeltDriveRequest {
    pub d_driving: f64,
    pub d_driven: f64,
    pub rpm: f64,
    pub center_distance: f64,
    #[serde(default)]
    pub belt_type: BeltType,
}

// ============================================================================
// Error Mapping
// ============================================================================

fn analysis_error_response(e: &AnalysisError) -> Response {
    let code = match e {
        AnalysisError::IncompleteSystem { .. } => "INCOMPLETE_SYSTEM",
        AnalysisError::InvalidComponentData { .. } => "INVALID_COMPONENT_DATA",
    };
    ApiErrorResponse::invalid_input(code, e.to_string())
}

fn catalog_error_response(e: &CatalogError) -> Response {
    match e {
        CatalogError::Shape(_) => {
            error!(error = %e, "Catalog rejected");
            ApiErrorResponse::internal(e.to_string())
        }
        _ => {
            warn!(error = %e, "Catalog unavailable");
            ApiErrorResponse::service_unavailable(e.to_string())
        }
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    ApiErrorResponse::bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/health
pub async fn get_health() -> Response {
    ApiResponse::ok(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/v1/config
pub async fn get_config(State(state): State<AppState>) -> Response {
    ApiResponse::ok(state.config.as_ref())
}

/// GET /api/v1/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Response {
    let provider = state.optimizer.catalog().clone();
    match provider.snapshot() {
        Ok(catalog) => ApiResponse::ok(serde_json::json!({
            "source": provider.source_name(),
            "catalog": catalog,
        })),
        Err(e) => catalog_error_response(&e),
    }
}

/// POST /api/v1/analyze
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<System>, JsonRejection>,
) -> Response {
    let Json(system) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match state.analyzer.analyze(&system) {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => analysis_error_response(&e),
    }
}

/// POST /api/v1/belt-drive
pub async fn belt_drive(
    State(state): State<AppState>,
    body: Result<Json<BeltDriveRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match BeltDrive::new(req.d_driving, req.d_driven, req.rpm, req.center_distance, req.belt_type) {
        Ok(drive) => ApiResponse::ok(drive.geometry(state.config.physics.v_belt_slip)),
        Err(e) => ApiErrorResponse::invalid_input("INVALID_COMPONENT_DATA", e.to_string()),
    }
}

/// POST /api/v1/optimize
///
/// The search is CPU bound, so it runs on the blocking pool with a child
/// of the shutdown token and the configured deadline.
pub async fn optimize(
    State(state): State<AppState>,
    body: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let mut control = SearchControl::new(state.shutdown.child_token());
    if let Some(timeout) = state.config.optimizer.timeout() {
        control = control.with_timeout(timeout);
    }

    let optimizer = state.optimizer.clone();
    let joined = tokio::task::spawn_blocking(move || {
        optimizer.optimize_with(&req.system, req.goal, req.limit, &control)
    })
    .await;

    match joined {
        Ok(Ok(outcome)) => ApiResponse::ok(outcome),
        Ok(Err(e)) => catalog_error_response(&e),
        Err(e) => {
            error!(error = %e, "Optimization task failed");
            ApiErrorResponse::internal("Optimization task failed")
        }
    }
}

/// Fallback for unmatched paths
pub async fn not_found() -> Response {
    ApiErrorResponse::not_found("No such endpoint")
}
