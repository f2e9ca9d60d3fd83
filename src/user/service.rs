//! User service for registration and credential verification.

use anyhow::{Result, bail};
use tracing::{info, instrument};

use super::models::{RegisterRequest, User};
use super::repository::UserRepository;
use crate::auth::{PasswordScheme, Role};

/// Service for identity management.
///
/// Orchestrates the registration and login flows: uniqueness checks,
/// password hashing via the configured scheme, and role assignment policy.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
    scheme: PasswordScheme,
    honor_requested_role: bool,
}

impl UserService {
    /// Create a new user service.
    pub fn new(repo: UserRepository, scheme: PasswordScheme, honor_requested_role: bool) -> Self {
        Self {
            repo,
            scheme,
            honor_requested_role,
        }
    }

    /// Register a new user.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        if !is_valid_username(&request.username) {
            bail!(
                "Invalid username format. Must be 3-50 alphanumeric characters, underscores, or hyphens."
            );
        }

        if request.password.len() < 6 {
            bail!("Password must be at least 6 characters.");
        }

        // Pre-check for a friendly error; the unique constraint is the
        // authoritative guard under concurrency.
        if !self.repo.is_username_available(&request.username).await? {
            bail!("Username '{}' is already taken.", request.username);
        }

        let role = match (&request.role, self.honor_requested_role) {
            (Some(requested), true) => match requested.parse::<Role>() {
                Ok(role) => role,
                Err(_) => bail!("Invalid role: '{}'.", requested),
            },
            _ => Role::Registered,
        };

        let display_name = request
            .display_name
            .clone()
            .unwrap_or_else(|| request.username.clone());

        let password_hash = self.scheme.hash(&request.password)?;

        let user = self
            .repo
            .create(&request.username, &password_hash, &display_name, role)
            .await?;
        info!(user_id = %user.id, username = %user.username, "Registered new user");

        Ok(user)
    }

    /// Verify user credentials.
    ///
    /// Returns `None` both for an unknown username and for a wrong
    /// password; callers cannot distinguish the two.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self.repo.get_by_username(username).await?;

        match user {
            Some(user) if self.scheme.verify(password, &user.password_hash) => {
                self.repo.update_last_login(&user.id).await?;
                Ok(Some(user))
            }
            _ => Ok(None),
        }
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.repo.get(id).await
    }

    /// Get a user by username (case-insensitive).
    #[instrument(skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.repo.get_by_username(username).await
    }

    /// List users, ordered by username.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }
}

/// Validate username format.
fn is_valid_username(username: &str) -> bool {
    let len = username.len();
    if !(3..=50).contains(&len) {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_service(scheme: PasswordScheme, honor_requested_role: bool) -> UserService {
        let db = Database::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool().clone());
        repo.ensure_roles().await.unwrap();
        UserService::new(repo, scheme, honor_requested_role)
    }

    fn register_request(username: &str, password: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            display_name: None,
            role: role.map(String::from),
        }
    }

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("user"));
        assert!(is_valid_username("user_name"));
        assert!(is_valid_username("user-name"));
        assert!(is_valid_username("user123"));
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username("user@name")); // invalid char
        assert!(!is_valid_username("user name")); // space
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = setup_service(PasswordScheme::Bcrypt, false).await;

        let user = service
            .register(register_request("alice", "Secret1", None))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Registered);
        // Stored hash is never the raw password
        assert_ne!(user.password_hash, "Secret1");

        let verified = service.verify_credentials("alice", "Secret1").await.unwrap();
        assert!(verified.is_some());

        let wrong = service
            .verify_credentials("alice", "Secret1x")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = service.verify_credentials("bob", "Secret1").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_login_username_is_case_insensitive() {
        let service = setup_service(PasswordScheme::Bcrypt, false).await;
        service
            .register(register_request("alice", "Secret1", None))
            .await
            .unwrap();

        let verified = service.verify_credentials("ALICE", "Secret1").await.unwrap();
        assert!(verified.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let service = setup_service(PasswordScheme::Bcrypt, false).await;
        service
            .register(register_request("alice", "Secret1", None))
            .await
            .unwrap();

        let err = service
            .register(register_request("alice", "Other99", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already taken"));

        // Case variant is still a duplicate
        let err = service
            .register(register_request("ALICE", "Other99", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn test_requested_role_ignored_by_default() {
        let service = setup_service(PasswordScheme::Bcrypt, false).await;

        let user = service
            .register(register_request("alice", "Secret1", Some("admin")))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Registered);
    }

    #[tokio::test]
    async fn test_requested_role_honored_when_configured() {
        let service = setup_service(PasswordScheme::Bcrypt, true).await;

        let user = service
            .register(register_request("alice", "Secret1", Some("admin")))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);

        let err = service
            .register(register_request("bob", "Secret1", Some("root")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid role"));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = setup_service(PasswordScheme::Bcrypt, false).await;

        let err = service
            .register(register_request("ab", "Secret1", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid username"));

        let err = service
            .register(register_request("alice", "short", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }

    #[tokio::test]
    async fn test_legacy_scheme_round_trip() {
        let service = setup_service(PasswordScheme::Sha256, false).await;

        let user = service
            .register(register_request("alice", "Secret1", None))
            .await
            .unwrap();
        // Unsalted hex digest: 64 lowercase hex chars
        assert_eq!(user.password_hash.len(), 64);

        assert!(
            service
                .verify_credentials("alice", "Secret1")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            service
                .verify_credentials("alice", "wrong")
                .await
                .unwrap()
                .is_none()
        );
    }
}
