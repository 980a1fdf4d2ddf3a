//! # carebook-api
//!
//! The HTTP surface of the Carebook service.
//!
//! | Method | Path              | Success                         |
//! |--------|-------------------|---------------------------------|
//! | GET    | `/`               | 200 greeting                    |
//! | GET    | `/about/{name}`   | 200 greeting                    |
//! | GET    | `/view`           | 200 every patient keyed by id   |
//! | GET    | `/patient/{id}`   | 200 one patient                 |
//! | GET    | `/sort`           | 200 patients ordered by a field |
//! | POST   | `/create`         | 201                             |
//! | PUT    | `/update/{id}`    | 201                             |
//! | DELETE | `/delete/{id}`    | 201                             |
//! | POST   | `/predict`        | 200 premium category            |
//!
//! Errors are mapped by [`error::ApiError`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::body::Body;
use axum::http::Request;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use carebook_contracts::error::{CarebookError, CarebookResult};

pub use config::ServiceConfig;
pub use error::ApiError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/about/:name", get(handlers::about))
        .route("/view", get(handlers::view))
        .route("/patient/:id", get(handlers::patient))
        .route("/sort", get(handlers::sort))
        .route("/create", post(handlers::create))
        .route("/update/:id", put(handlers::update))
        .route("/delete/:id", delete(handlers::delete))
        .route("/predict", post(handlers::predict))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Build the application from `config` and serve it until the process is
/// stopped.
pub async fn serve(config: &ServiceConfig) -> CarebookResult<()> {
    let addr = config.bind_addr()?;
    let state = AppState::from_config(config)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CarebookError::Config {
            reason: format!("cannot listen on {addr}: {e}"),
        })?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| CarebookError::StateError {
            reason: format!("server stopped: {e}"),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
