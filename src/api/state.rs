//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::AuthState;
use crate::catalog::CatalogService;
use crate::user::UserService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User service for registration, login, and listing.
    pub users: Arc<UserService>,
    /// Catalog service for categories and movies.
    pub catalog: Arc<CatalogService>,
    /// Authentication state.
    pub auth: AuthState,
}

impl AppState {
    /// Create new application state.
    pub fn new(users: UserService, catalog: CatalogService, auth: AuthState) -> Self {
        Self {
            users: Arc::new(users),
            catalog: Arc::new(catalog),
            auth,
        }
    }
}
