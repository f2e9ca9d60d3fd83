//! HTTP API module.
//!
//! Provides the REST endpoints for the catalog and authentication flows.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
