use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use menu_core::CoreError;
use serde_json::json;

/// Client-facing failures. The message is a stable snake_case code that ends
/// up as `{"error": "<code>"}`.
#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn unauthorized(code: &str) -> Self {
        Self::AuthenticationError(code.to_string())
    }

    pub fn bad_request(code: &str) -> Self {
        Self::ValidationError(code.to_string())
    }

    pub fn not_found(code: &str) -> Self {
        Self::NotFoundError(code.to_string())
    }

    pub fn conflict(code: &str) -> Self {
        Self::ConflictError(code.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error".to_string())
            },
            AppError::Anyhow(err) => match err.downcast_ref::<CoreError>() {
                Some(CoreError::ValidationError(msg)) => (StatusCode::BAD_REQUEST, msg.replace(' ', "_")),
                Some(CoreError::ConflictError(msg)) => (StatusCode::CONFLICT, msg.replace(' ', "_")),
                _ => {
                    tracing::error!("Internal Server Error: {:#}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error".to_string())
                }
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::unauthorized("invalid_token").into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::bad_request("missing_fields").into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("product_not_found").into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("email_in_use").into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_core_errors_map_by_kind() {
        let validation: AppError = CoreError::ValidationError("no updates".to_string()).into();
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let conflict: AppError = CoreError::ConflictError("email in use".to_string()).into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let storage: AppError = CoreError::storage(io).into();
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
