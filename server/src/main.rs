//! Carebook: patient records and premium prediction over HTTP.
//!
//! Usage:
//!   carebook serve --config carebook.toml
//!   carebook init-store --store data/patients.json
//!   carebook check-intake intake.json

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use carebook_api::ServiceConfig;
use carebook_contracts::error::{CarebookError, CarebookResult};
use carebook_store::JsonFileStore;
use carebook_verify::PayloadVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Carebook patient service.
#[derive(Parser)]
#[command(
    name = "carebook",
    about = "Patient record service with insurance premium prediction",
    long_about = "Serves the patient CRUD and premium prediction API over HTTP,\n\
                  and provides maintenance commands for the JSON patient store."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// TOML configuration file. Missing keys take their defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Listen address, e.g. 0.0.0.0:8000.
        #[arg(long)]
        bind: Option<String>,
        /// Patient store file.
        #[arg(long)]
        store: Option<PathBuf>,
        /// Decision-forest model artifact.
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Create an empty patient store.
    InitStore {
        #[arg(long, default_value = "patients.json")]
        store: PathBuf,
        /// Replace the file if it already exists.
        #[arg(long)]
        force: bool,
    },
    /// Validate a patient intake form and print the normalized result.
    CheckIntake {
        /// JSON document holding one intake form.
        file: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-operation output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve {
            config,
            bind,
            store,
            model,
        } => load_config(config.as_deref(), bind, store, model).and_then(|c| run_server(&c)),
        Command::InitStore { store, force } => init_store(store, force),
        Command::CheckIntake { file } => check_intake(&file),
    };

    if let Err(e) = result {
        eprintln!("carebook: {e}");
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Read the config file (if any), then apply command-line overrides.
fn load_config(
    path: Option<&Path>,
    bind: Option<String>,
    store: Option<PathBuf>,
    model: Option<PathBuf>,
) -> CarebookResult<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(store) = store {
        config.store.path = store;
    }
    if let Some(model) = model {
        config.model.path = model;
    }
    Ok(config)
}

fn run_server(config: &ServiceConfig) -> CarebookResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CarebookError::StateError {
            reason: format!("failed to start async runtime: {e}"),
        })?;

    info!(
        bind = %config.server.bind,
        store = %config.store.path.display(),
        model = %config.model.path.display(),
        "starting carebook"
    );
    runtime.block_on(carebook_api::serve(config))
}

fn init_store(path: PathBuf, force: bool) -> CarebookResult<()> {
    let store = JsonFileStore::init(path, force)?;
    println!("Empty patient store written to {}", store.path().display());
    Ok(())
}

fn check_intake(file: &Path) -> CarebookResult<()> {
    let contents = std::fs::read_to_string(file).map_err(|e| CarebookError::BadRequest {
        reason: format!("failed to read '{}': {e}", file.display()),
    })?;
    let payload: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| CarebookError::BadRequest {
            reason: format!("'{}' is not valid JSON: {e}", file.display()),
        })?;

    let verifier = PayloadVerifier::new()?;
    match verifier.intake(&payload) {
        Ok(accepted) => {
            let rendered =
                serde_json::to_string_pretty(&accepted).map_err(|e| CarebookError::BadRequest {
                    reason: format!("cannot render accepted form: {e}"),
                })?;
            println!("{rendered}");
            Ok(())
        }
        Err(CarebookError::Validation { failures }) => {
            println!("Intake form rejected ({} problem(s)):", failures.len());
            for failure in &failures {
                println!("  - {failure}");
            }
            Err(CarebookError::Validation { failures })
        }
        Err(other) => Err(other),
    }
}
