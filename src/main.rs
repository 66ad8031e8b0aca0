//! transmission-sizer - belt drive analysis and catalog optimization
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API
//! transmission-sizer serve --addr 0.0.0.0:8080
//!
//! # Analyze a system description
//! transmission-sizer analyze system.json
//!
//! # Rank catalog substitutions for a base system
//! transmission-sizer optimize system.json --goal life --limit 3 --catalog parts.toml
//!
//! # Belt geometry for a pulley pair
//! transmission-sizer belt --d-driving 100 --d-driven 200 --rpm 1750 --center-distance 500
//!
//! # Validate a config file
//! transmission-sizer check-config sizer_config.toml
//! ```
//!
//! # Environment Variables
//!
//! - `SIZER_CONFIG`: Path to the TOML config (default: ./sizer_config.toml)
//! - `SIZER_SERVER_ADDR`: HTTP bind address for `serve`
//! - `SIZER_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `SIZER_LOG_FORMAT`: `json` for structured log lines
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use transmission_sizer::api::{create_app, AppState};
use transmission_sizer::catalog::{provider_from_config, CatalogProvider, FileCatalog};
use transmission_sizer::config::{self, SizerConfig};
use transmission_sizer::types::{BeltType, OptimizationGoal, System};
use transmission_sizer::{BeltDrive, CatalogOptimizer, SearchControl, TransmissionAnalyzer};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "transmission-sizer")]
#[command(about = "Belt & pulley transmission analyzer and catalog optimizer")]
#[command(version)]
struct CliArgs {
    /// Config file to use instead of the SIZER_CONFIG / ./sizer_config.toml search
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP API
    Serve {
        /// Override the server address (default from [server] addr)
        #[arg(short, long, env = "SIZER_SERVER_ADDR")]
        addr: Option<String>,
    },

    /// Analyze a system description (JSON) and print the result
    Analyze {
        /// Path to a `{ "components": [...] }` JSON file
        system: PathBuf,
    },

    /// Rank catalog substitutions into a base system
    Optimize {
        /// Path to the base system JSON file
        system: PathBuf,
        /// Catalog file (.toml or .json); overrides [catalog] path
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        /// Ranking objective: cost, life or efficiency
        #[arg(long, default_value = "cost")]
        goal: OptimizationGoal,
        /// Number of solutions to return (default from [optimizer] default_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Belt length, contact arc and driven speed for a pulley pair
    Belt {
        /// Driving pulley diameter (mm)
        #[arg(long)]
        d_driving: f64,
        /// Driven pulley diameter (mm)
        #[arg(long)]
        d_driven: f64,
        /// Driving shaft speed (rpm)
        #[arg(long)]
        rpm: f64,
        /// Shaft center distance (mm)
        #[arg(long)]
        center_distance: f64,
        /// Belt type: V, synchronous or flat
        #[arg(long, default_value = "V", value_parser = parse_belt_type)]
        belt_type: BeltType,
    },

    /// Validate a config file and print the effective configuration
    CheckConfig {
        /// Path to the TOML file
        file: PathBuf,
    },
}

fn parse_belt_type(s: &str) -> Result<BeltType, String> {
    match serde_json::from_value(serde_json::Value::String(s.to_string())) {
        Ok(BeltType::Other) | Err(_) => Err(format!(
            "unknown belt type '{s}' (expected V, synchronous or flat)"
        )),
        Ok(t) => Ok(t),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<SizerConfig> {
    match path {
        Some(p) => SizerConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(SizerConfig::load()),
    }
}

fn read_system(path: &Path) -> Result<System> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid system description in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Token cancelled on Ctrl+C.
fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        trigger.cancel();
    });
    token
}

// ============================================================================
// Commands
// ============================================================================

async fn run_server(addr: Option<String>) -> Result<()> {
    let sizer_config = config::get().clone();
    let server_addr = addr.unwrap_or_else(|| sizer_config.server.addr.clone());

    let cancel_token = shutdown_on_ctrl_c();
    let state = AppState::new(sizer_config).with_shutdown(cancel_token.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("HTTP server listening on {}", server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}

async fn run_optimize(
    system: &Path,
    catalog: Option<PathBuf>,
    goal: OptimizationGoal,
    limit: Option<usize>,
) -> Result<()> {
    let sizer_config = config::get();
    let base = read_system(system)?;
    let provider: Arc<dyn CatalogProvider> = match catalog {
        Some(path) => Arc::new(FileCatalog::new(path)),
        None => provider_from_config(&sizer_config.catalog),
    };
    let optimizer = CatalogOptimizer::new(
        TransmissionAnalyzer::new(sizer_config.physics.clone()),
        provider,
        sizer_config.optimizer.clone(),
    );

    let mut control = SearchControl::new(shutdown_on_ctrl_c());
    if let Some(timeout) = sizer_config.optimizer.timeout() {
        control = control.with_timeout(timeout);
    }

    let outcome = tokio::task::spawn_blocking(move || {
        optimizer.optimize_with(&base, goal, limit, &control)
    })
    .await
    .context("Optimization task failed")?
    .context("Optimization aborted")?;

    if let Some(reason) = outcome.skipped {
        warn!(%reason, "Base system cannot be optimized");
    }
    print_json(&outcome)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout stays machine-readable)
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr);
    if std::env::var("SIZER_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let args = CliArgs::parse();

    if let SubCommand::CheckConfig { file } = &args.command {
        let checked = SizerConfig::load_from_file(file)
            .with_context(|| format!("Config check failed for {}", file.display()))?;
        info!(path = %file.display(), "Config is valid");
        print!("{}", checked.to_toml()?);
        return Ok(());
    }

    config::init(load_config(args.config.as_deref())?);

    match args.command {
        SubCommand::Serve { addr } => run_server(addr).await,
        SubCommand::Analyze { system } => {
            let system = read_system(&system)?;
            let result = TransmissionAnalyzer::from_global()
                .analyze(&system)
                .context("Analysis failed")?;
            print_json(&result)
        }
        SubCommand::Optimize {
            system,
            catalog,
            goal,
            limit,
        } => run_optimize(&system, catalog, goal, limit).await,
        SubCommand::Belt {
            d_driving,
            d_driven,
            rpm,
            center_distance,
            belt_type,
        } => {
            let drive = BeltDrive::new(d_driving, d_driven, rpm, center_distance, belt_type)
                .context("Invalid belt drive")?;
            print_json(&drive.geometry(config::get().physics.v_belt_slip))
        }
        SubCommand::CheckConfig { .. } => Ok(()),
    }
}
