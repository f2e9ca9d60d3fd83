//! HTTP request handlers.

pub mod auth;
pub mod categories;
pub mod movies;
pub mod users;

use axum::Json;
use serde_json::{Value, json};

/// Health check endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
