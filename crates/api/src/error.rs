//! Error responses.
//!
//! Every failure leaves the API as `{ "error": CODE, "message": text }` with
//! the status code of its [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rentbook_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Renders any repository or domain error as a JSON error response.
///
/// Database and internal errors are logged and replaced by a generic
/// message.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_internal() {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    } else {
        warn!(error = %err, code = err.error_code(), "Request rejected");
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let response = error_response(AppError::Conflict("Bill exists".into()));
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(body["message"], "Conflict: Bill exists");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = error_response(AppError::Database("connection reset".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }
}
