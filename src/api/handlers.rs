use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ListEntry, ListPage},
};

use super::{
    validation::{AddToListBody, ListParams, RemoveFromListBody},
    AppState,
};

const REMOVED_MESSAGE: &str = "Item removed from My List successfully";

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Unwraps a JSON body. A request without a JSON content type is treated as an
/// empty body so it fails field validation like any other incomplete request.
fn json_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Server is healthy" })),
    )
}

/// Adds an item to a user's list
pub async fn add_to_my_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AddToListBody>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<ListEntry>>)> {
    let request = json_body(payload)?.validate()?;

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        content_id = %request.content_id,
        "Processing add to list request"
    );

    let entry = state.my_list.add_to_list(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

/// Returns one page of a user's list
pub async fn get_my_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ListPage>>> {
    let Query(params) = params?;
    let query = params.validate()?;

    tracing::info!(
        request_id = %request_id,
        user_id = %query.user_id,
        search = query.search_term().is_some(),
        "Processing list request"
    );

    let page = state.my_list.get_list(query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// Removes an item from a user's list
pub async fn remove_from_my_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RemoveFromListBody>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ListEntry>>> {
    let request = json_body(payload)?.validate()?;

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        content_id = %request.content_id,
        "Processing remove from list request"
    );

    let entry = state.my_list.remove_from_list(request).await?;

    Ok(Json(ApiResponse::ok(entry).with_message(REMOVED_MESSAGE)))
}
