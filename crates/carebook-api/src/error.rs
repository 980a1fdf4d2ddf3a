//! Mapping from `CarebookError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use carebook_contracts::error::CarebookError;

/// Error returned by every handler.
///
/// Validation failures become 422 with the full violation list under
/// `detail`; every other error becomes `{"detail": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub CarebookError);

impl From<CarebookError> for ApiError {
    fn from(err: CarebookError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CarebookError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CarebookError::NotFound { .. } => StatusCode::NOT_FOUND,
            CarebookError::Conflict { .. } | CarebookError::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            CarebookError::Storage { .. }
            | CarebookError::Model { .. }
            | CarebookError::Config { .. }
            | CarebookError::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.0.is_client_error() {
            warn!(status = status.as_u16(), error = %self.0, "request rejected");
        } else {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        }

        let body = match self.0 {
            CarebookError::Validation { failures } => json!({ "detail": failures }),
            other => json!({ "detail": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use carebook_contracts::error::CarebookError;

    use super::ApiError;

    fn status_of(err: CarebookError) -> StatusCode {
        ApiError::from(err).status()
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            status_of(CarebookError::invalid("age", "must be > 0")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(CarebookError::NotFound { id: "P9".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CarebookError::Conflict { id: "P1".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CarebookError::BadRequest { reason: "x".into() }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn service_errors_map_to_500() {
        for err in [
            CarebookError::Storage { reason: "disk".into() },
            CarebookError::Model { reason: "empty forest".into() },
            CarebookError::Config { reason: "bind".into() },
            CarebookError::StateError { reason: "poisoned".into() },
        ] {
            assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
