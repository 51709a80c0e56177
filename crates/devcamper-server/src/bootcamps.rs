use std::sync::Arc;

use axum::extract::{FromRequest, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use devcamper_config::server::API_PREFIX;
use devcamper_store::{BootcampInput, BootcampRepository};
use serde::Serialize;

use crate::failure::ApiError;

/// JSON request body whose rejections go through the failure pipeline
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Successful response body
#[derive(Debug, Serialize)]
struct Success<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    data: T,
}

impl<T: Serialize> Success<T> {
    const fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }
}

impl<T: Serialize> Success<Vec<T>> {
    fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
        }
    }
}

#[derive(Clone)]
struct BootcampState {
    repository: Arc<dyn BootcampRepository>,
}

/// Routes under `/api/v1/bootcamps`
pub fn router(repository: Arc<dyn BootcampRepository>) -> Router {
    let collection = format!("{API_PREFIX}/bootcamps");
    let item = format!("{collection}/{{id}}");

    Router::new()
        .route(&collection, get(list_bootcamps).post(create_bootcamp))
        .route(&item, get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp))
        .with_state(BootcampState { repository })
}

async fn list_bootcamps(State(state): State<BootcampState>) -> Result<Response, ApiError> {
    let bootcamps = state.repository.list().await?;
    Ok(Json(Success::list(bootcamps)).into_response())
}

async fn get_bootcamp(State(state): State<BootcampState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let bootcamp = state.repository.get(&id).await?;
    Ok(Json(Success::data(bootcamp)).into_response())
}

async fn create_bootcamp(
    State(state): State<BootcampState>,
    JsonBody(input): JsonBody<BootcampInput>,
) -> Result<Response, ApiError> {
    let bootcamp = state.repository.create(input).await?;
    tracing::info!(id = %bootcamp.id, name = %bootcamp.name, "bootcamp created");
    Ok((StatusCode::CREATED, Json(Success::data(bootcamp))).into_response())
}

async fn update_bootcamp(
    State(state): State<BootcampState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<BootcampInput>,
) -> Result<Response, ApiError> {
    let bootcamp = state.repository.update(&id, patch).await?;
    Ok(Json(Success::data(bootcamp)).into_response())
}

async fn delete_bootcamp(State(state): State<BootcampState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let removed = state.repository.delete(&id).await?;
    tracing::info!(id = %removed.id, "bootcamp deleted");
    Ok(Json(Success::data(serde_json::Map::new())).into_response())
}
