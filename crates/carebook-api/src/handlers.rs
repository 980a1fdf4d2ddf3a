//! Route handlers.
//!
//! Store-backed handlers hand their work to tokio's blocking pool, since
//! every call reads (and possibly rewrites) the whole store file.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use carebook_contracts::{
    error::{CarebookError, CarebookResult},
    patient::{PatientId, PatientView, SortKey, SortOrder},
};
use carebook_core::PatientService;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn home() -> Json<Value> {
    Json(json!({ "msg": "Patient Management System API" }))
}

pub async fn about(Path(name): Path<String>) -> Json<Value> {
    Json(json!({
        "msg": format!("Hello {name}, this API manages patient records and predicts insurance premium categories")
    }))
}

pub async fn view(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<PatientId, PatientView>>, ApiError> {
    let patients = run_blocking(&state, |service| service.list()).await?;
    Ok(Json(patients))
}

pub async fn patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientView>, ApiError> {
    let view = run_blocking(&state, move |service| service.get(&id)).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

pub async fn sort(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<PatientView>>, ApiError> {
    let key: SortKey = params
        .sort_by
        .as_deref()
        .ok_or_else(|| CarebookError::BadRequest {
            reason: format!(
                "query parameter 'sort_by' is required; select from {:?}",
                SortKey::ALLOWED
            ),
        })?
        .parse()?;
    let order: SortOrder = match params.order.as_deref() {
        Some(raw) => raw.parse()?,
        None => SortOrder::default(),
    };

    let views = run_blocking(&state, move |service| service.sorted(key, order)).await?;
    Ok(Json(views))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(body_rejected)?;

    let id = run_blocking(&state, move |service| service.create(&payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "patient created successfully", "id": id })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(body_rejected)?;

    let view = run_blocking(&state, move |service| service.update(&id, &payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "patient updated", "patient": view })),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    run_blocking(&state, move |service| service.delete(&id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "patient deleted" })),
    ))
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(body_rejected)?;

    let input = state.validator.prediction_input(&payload)?;
    let prediction = state.premium.predict(&input)?;
    Ok((StatusCode::OK, Json(prediction)))
}

fn body_rejected(rejection: JsonRejection) -> ApiError {
    debug!(error = %rejection, "request body rejected");
    ApiError(CarebookError::BadRequest {
        reason: rejection.body_text(),
    })
}

async fn run_blocking<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&PatientService) -> CarebookResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.patients);
    let outcome = tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| CarebookError::StateError {
            reason: format!("store task did not complete: {e}"),
        })?;
    Ok(outcome?)
}
