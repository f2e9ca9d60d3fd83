//! User repository for database operations.

use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::User;
use crate::auth::Role;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new user ID.
    fn generate_id() -> String {
        format!("usr_{}", nanoid::nanoid!(12))
    }

    /// Ensure the static role set exists.
    ///
    /// Idempotent; run once at startup, never from the registration path.
    #[instrument(skip(self))]
    pub async fn ensure_roles(&self) -> Result<()> {
        for role in Role::ALL {
            sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?)")
                .bind(role.to_string())
                .execute(&self.pool)
                .await
                .context("Failed to seed roles")?;
        }
        Ok(())
    }

    /// Create a new user with an already-hashed password.
    ///
    /// The UNIQUE constraint on `username` is the authoritative duplicate
    /// check; a violation surfaces as the same duplicate-username error the
    /// pre-check produces, so concurrent registrations cannot slip through.
    #[instrument(skip(self, password_hash))]
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        display_name: &str,
        role: Role,
    ) -> Result<User> {
        let id = Self::generate_id();

        debug!("Creating user: {} ({})", username, id);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, display_name, role)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e
                && db.is_unique_violation()
            {
                return anyhow!("Username '{}' is already taken.", username);
            }
            anyhow::Error::new(e).context("Failed to insert user")
        })?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow!("User not found after creation"))
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, display_name, role, created_at, last_login_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        Ok(user)
    }

    /// Get a user by username. Comparison is case-insensitive (the column
    /// collation handles it).
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, display_name, role, created_at, last_login_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by username")?;

        Ok(user)
    }

    /// List all users, ordered by username ascending.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, display_name, role, created_at, last_login_at
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        Ok(users)
    }

    /// Check if a username is available (case-insensitive).
    #[instrument(skip(self))]
    pub async fn is_username_available(&self, username: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check username availability")?;

        Ok(count.0 == 0)
    }

    /// Update last login timestamp.
    #[instrument(skip(self))]
    pub async fn update_last_login(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = datetime('now') WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update last login")?;

        Ok(())
    }

    /// Count total users.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_repo() -> UserRepository {
        let db = Database::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool().clone());
        repo.ensure_roles().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_ensure_roles_is_idempotent() {
        let repo = setup_repo().await;
        // Second run must be a no-op, not an error
        repo.ensure_roles().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = setup_repo().await;

        let user = repo
            .create("alice", "hashed", "Alice", Role::Registered)
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.display_name, "Alice");
        assert_eq!(user.role, Role::Registered);
        assert!(user.id.starts_with("usr_"));
        assert!(user.last_login_at.is_none());

        let fetched = repo.get(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);

        let by_username = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_username.id, user.id);
    }

    #[tokio::test]
    async fn test_get_by_username_is_case_insensitive() {
        let repo = setup_repo().await;
        repo.create("Alice", "hashed", "Alice", Role::Registered)
            .await
            .unwrap();

        assert!(repo.get_by_username("alice").await.unwrap().is_some());
        assert!(repo.get_by_username("ALICE").await.unwrap().is_some());
        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_by_constraint() {
        let repo = setup_repo().await;
        repo.create("alice", "hashed", "Alice", Role::Registered)
            .await
            .unwrap();

        // Same username, different case: the NOCASE unique constraint fires
        let err = repo
            .create("ALICE", "hashed2", "Other", Role::Registered)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn test_username_availability() {
        let repo = setup_repo().await;
        assert!(repo.is_username_available("alice").await.unwrap());

        repo.create("alice", "hashed", "Alice", Role::Registered)
            .await
            .unwrap();
        assert!(!repo.is_username_available("alice").await.unwrap());
        assert!(!repo.is_username_available("ALICE").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_ordered_by_username() {
        let repo = setup_repo().await;
        for name in ["charlie", "alice", "bob"] {
            repo.create(name, "hashed", name, Role::Registered)
                .await
                .unwrap();
        }

        let users = repo.list().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let repo = setup_repo().await;
        let user = repo
            .create("alice", "hashed", "Alice", Role::Registered)
            .await
            .unwrap();

        repo.update_last_login(&user.id).await.unwrap();
        let fetched = repo.get(&user.id).await.unwrap().unwrap();
        assert!(fetched.last_login_at.is_some());
    }
}
