//! API route definitions.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::auth_middleware;

use super::handlers;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - use specific origins from config
    let cors = build_cors_layer(&state);

    // Tracing layer with request IDs and timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Clone auth state for middleware
    let auth_state = state.auth.clone();

    // Protected routes (require a valid token; RequireAdmin gates further)
    let protected_routes = Router::new()
        // Category mutations (any authenticated user)
        .route("/categories", post(handlers::categories::create_category))
        .route(
            "/categories/{category_id}",
            patch(handlers::categories::update_category),
        )
        .route(
            "/categories/{category_id}",
            delete(handlers::categories::delete_category),
        )
        // Movie mutations (admin)
        .route("/movies", post(handlers::movies::create_movie))
        .route("/movies/{movie_id}", patch(handlers::movies::update_movie))
        .route(
            "/movies/{movie_id}",
            delete(handlers::movies::delete_movie),
        )
        // User management (admin)
        .route("/users", get(handlers::users::list_users))
        .route("/users/{user_id}", get(handlers::users::get_user))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // Public routes (no authentication)
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Catalog reads are anonymous
        .route("/categories", get(handlers::categories::list_categories))
        .route(
            "/categories/{category_id}",
            get(handlers::categories::get_category),
        )
        .route("/movies", get(handlers::movies::list_movies))
        .route("/movies/search", get(handlers::movies::search_movies))
        .route(
            "/movies/by-category/{category_id}",
            get(handlers::movies::list_by_category),
        )
        .route("/movies/{movie_id}", get(handlers::movies::get_movie))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(trace_layer)
}

/// Build the CORS layer based on configuration.
///
/// With no configured origins, all cross-origin requests are denied.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins = state.auth.allowed_origins();

    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
        header::COOKIE,
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, denying all cross-origin requests");
        CorsLayer::new().allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("null"), // This effectively denies all CORS
        ))
    } else {
        tracing::info!("CORS: Allowing {} origin(s)", origins.len());
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    }
}
