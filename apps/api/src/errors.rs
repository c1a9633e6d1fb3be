use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors from bullet scoring, selection and the rewrite-id contract.
///
/// All of these are deterministic: the same input produces the same error, so callers
/// must surface them rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TailorError {
    #[error("resume contains no experience bullets to score")]
    EmptyInput,

    #[error("invalid checklist field '{field}': {reason}")]
    InvalidChecklist { field: String, reason: String },

    #[error("malformed bullet id '{id}' (expected exp{{i}}_bullet{{j}})")]
    InvalidBulletId { id: String },

    #[error("bullet id '{id}' does not resolve to a bullet in this resume")]
    UnresolvableBullet { id: String },
}

impl TailorError {
    pub(crate) fn invalid_checklist(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TailorError::InvalidChecklist {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the render-measure bridge. Overflow is a status, never one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("render surface failed: {0}")]
    Render(String),

    #[error("render surface reported an invalid height ({0})")]
    InvalidMeasurement(f64),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Tailor(#[from] TailorError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                Value::Null,
            ),
            AppError::Tailor(TailorError::EmptyInput) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_INPUT",
                self.to_string(),
                Value::Null,
            ),
            AppError::Tailor(TailorError::InvalidChecklist { field, reason }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_CHECKLIST",
                self.to_string(),
                json!({ "field": field, "reason": reason }),
            ),
            AppError::Tailor(TailorError::InvalidBulletId { id })
            | AppError::Tailor(TailorError::UnresolvableBullet { id }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_BULLET_ID",
                self.to_string(),
                json!({ "id": id }),
            ),
            AppError::Layout(e) => {
                tracing::error!("Layout error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LAYOUT_ERROR",
                    "The layout engine could not measure this resume".to_string(),
                    Value::Null,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if !details.is_null() {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
