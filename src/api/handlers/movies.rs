//! Movie handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::RequireAdmin;
use crate::catalog::{CreateMovieRequest, Movie, UpdateMovieRequest};

/// List all movies.
#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<Movie>>> {
    let movies = state.catalog.list_movies().await?;
    Ok(Json(movies))
}

/// Get a single movie.
#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<Movie>> {
    let movie = state
        .catalog
        .get_movie(movie_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Movie not found: {}", movie_id)))?;

    Ok(Json(movie))
}

/// Create a movie (admin only).
#[instrument(skip(state, _admin, request), fields(name = %request.name))]
pub async fn create_movie(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(request): Json<CreateMovieRequest>,
) -> ApiResult<impl IntoResponse> {
    let movie = state.catalog.create_movie(request).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// Update a movie (admin only). The body id must match the path.
#[instrument(skip(state, _admin, request))]
pub async fn update_movie(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(movie_id): Path<i64>,
    Json(request): Json<UpdateMovieRequest>,
) -> ApiResult<StatusCode> {
    if request.id != movie_id {
        return Err(ApiError::bad_request(
            "Movie id in body does not match the path.",
        ));
    }

    state.catalog.update_movie(movie_id, request).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a movie (admin only).
#[instrument(skip(state, _admin))]
pub async fn delete_movie(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(movie_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_movie(movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List movies in a category.
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<Vec<Movie>>> {
    let movies = state.catalog.movies_by_category(category_id).await?;
    Ok(Json(movies))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
}

/// Search movies by name or description substring. An empty result is a
/// 404, matching the catalog's historical behavior.
#[instrument(skip(state))]
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Movie>>> {
    let movies = state.catalog.search_movies(&params.name).await?;

    if movies.is_empty() {
        return Err(ApiError::not_found(format!(
            "No movies matched '{}'.",
            params.name
        )));
    }

    Ok(Json(movies))
}
