use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every variant maps to an HTTP status and a machine-readable code. Store
/// failures are converted into the operation-specific `*Failed` variants by
/// the service; anything unexpected ends up as `Internal`.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("User not found")]
    UserNotFound,

    #[error("Content not found")]
    ContentNotFound,

    #[error("Invalid content type")]
    InvalidContentType,

    #[error("Invalid sort field")]
    InvalidSortField,

    #[error("Item already in My List")]
    ItemAlreadyExists,

    #[error("Item not found in My List")]
    ItemNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to save item to My List")]
    SaveFailed,

    #[error("Failed to remove item from My List")]
    RemoveFailed,

    #[error("Failed to retrieve My List")]
    GetListFailed,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UserNotFound
            | AppError::ContentNotFound
            | AppError::InvalidContentType
            | AppError::InvalidSortField
            | AppError::ItemAlreadyExists
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ItemNotFound => StatusCode::NOT_FOUND,
            AppError::SaveFailed
            | AppError::RemoveFailed
            | AppError::GetListFailed
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::ContentNotFound => "CONTENT_NOT_FOUND",
            AppError::InvalidContentType => "INVALID_CONTENT_TYPE",
            AppError::InvalidSortField => "INVALID_SORT_FIELD",
            AppError::ItemAlreadyExists => "ITEM_ALREADY_EXISTS",
            AppError::ItemNotFound => "ITEM_NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::SaveFailed => "ERROR_SAVING_TO_MY_LIST",
            AppError::RemoveFailed => "ERROR_REMOVING_FROM_MY_LIST",
            AppError::GetListFailed => "ERROR_GETTING_MY_LIST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to clients
    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        } else {
            tracing::warn!(code, error = %self, "Request rejected");
        }

        let body = Json(json!({
            "success": false,
            "message": self.public_message(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Response for a handler that panicked, used by `CatchPanicLayer`
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
