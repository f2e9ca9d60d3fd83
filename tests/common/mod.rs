//! Test utilities and common setup.

use axum::Router;
use cinevault::api::{self, AppState};
use cinevault::auth::{AuthConfig, AuthState, PasswordScheme, Role};
use cinevault::catalog::{CatalogService, CategoryRepository, MovieRepository};
use cinevault::db::Database;
use cinevault::user::{UserRepository, UserService};

/// JWT secret used across the integration tests.
pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Create a test AuthConfig with a JWT secret for testing.
fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Some(TEST_SECRET.to_string()),
        ..AuthConfig::default()
    }
}

/// Create a test application over an in-memory database.
///
/// Returns the router plus the auth state so tests can mint tokens with
/// arbitrary claims.
pub async fn test_app() -> (Router, AuthState) {
    let db = Database::in_memory().await.unwrap();

    let auth_state = AuthState::new(test_auth_config());

    let user_repo = UserRepository::new(db.pool().clone());
    user_repo.ensure_roles().await.unwrap();
    let user_service = UserService::new(user_repo, PasswordScheme::Bcrypt, false);

    let catalog_service = CatalogService::new(
        CategoryRepository::new(db.pool().clone()),
        MovieRepository::new(db.pool().clone()),
    );

    let state = AppState::new(user_service, catalog_service, auth_state.clone());
    (api::create_router(state), auth_state)
}

/// Mint a token carrying the admin role.
pub fn admin_token(auth: &AuthState) -> String {
    auth.generate_token("admin", "Admin", Role::Admin).unwrap()
}

/// Mint a token carrying the registered role.
pub fn registered_token(auth: &AuthState) -> String {
    auth.generate_token("carol", "Carol", Role::Registered)
        .unwrap()
}
