//! Category handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::CurrentUser;
use crate::catalog::{Category, CreateCategoryRequest, UpdateCategoryRequest};

/// List all categories.
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(categories))
}

/// Get a single category.
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<Category>> {
    let category = state
        .catalog
        .get_category(category_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", category_id)))?;

    Ok(Json(category))
}

/// Create a category. Any authenticated user may do this.
#[instrument(skip(state, _user, request))]
pub async fn create_category(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = state.catalog.create_category(&request.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category. The body id must match the path.
#[instrument(skip(state, _user, request))]
pub async fn update_category(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(category_id): Path<i64>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<StatusCode> {
    if request.id != category_id {
        return Err(ApiError::bad_request(
            "Category id in body does not match the path.",
        ));
    }

    state
        .catalog
        .update_category(category_id, &request.name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a category.
#[instrument(skip(state, _user))]
pub async fn delete_category(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(category_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
