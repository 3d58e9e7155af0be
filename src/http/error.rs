//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ValidationError;
use crate::store::StoreError;

/// Errors surfaced by HTTP handlers, rendered as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::CategoryInUse { .. }) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!({
                "error": self.to_string(),
                "details": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(vec![ValidationError::MissingApiKey]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(StoreError::RuleNotFound(Uuid::nil())).status(), StatusCode::NOT_FOUND);
        let in_use = StoreError::CategoryInUse {
            slug: "jars".into(),
            products: vec!["amber-jar".into()],
        };
        assert_eq!(ApiError::from(in_use).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_error_message_is_transparent() {
        let err = ApiError::from(StoreError::CategoryNotFound("jars".into()));
        assert_eq!(err.to_string(), "category `jars` not found");
    }
}
