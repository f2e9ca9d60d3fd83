//! Catalog repositories for database operations.

use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{Category, CreateMovieRequest, Movie, Rating, UpdateMovieRequest};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories, ordered by name ascending.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        Ok(categories)
    }

    /// Get a category by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category")?;

        Ok(category)
    }

    /// Check if a category exists by ID.
    #[instrument(skip(self))]
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check category existence")?;

        Ok(count.0 > 0)
    }

    /// Check if a category exists by name (case-insensitive, trimmed).
    #[instrument(skip(self))]
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories WHERE name = ?")
            .bind(name.trim())
            .fetch_one(&self.pool)
            .await
            .context("Failed to check category name")?;

        Ok(count.0 > 0)
    }

    /// Create a new category.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<Category> {
        debug!("Creating category: {}", name);

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name.trim())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e
                    && db.is_unique_violation()
                {
                    return anyhow!("Category '{}' already exists.", name.trim());
                }
                anyhow::Error::new(e).context("Failed to insert category")
            })?;

        self.get(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow!("Category not found after creation"))
    }

    /// Update a category name.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, name: &str) -> Result<Category> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name.trim())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e
                    && db.is_unique_violation()
                {
                    return anyhow!("Category '{}' already exists.", name.trim());
                }
                anyhow::Error::new(e).context("Failed to update category")
            })?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Category not found: {}", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| anyhow!("Category not found after update"))
    }

    /// Delete a category.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Category not found: {}", id));
        }

        Ok(())
    }
}

const MOVIE_COLUMNS: &str =
    "id, name, description, duration_minutes, image_path, rating, category_id, created_at";

/// Repository for movie database operations.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    pool: SqlitePool,
}

impl MovieRepository {
    /// Create a new movie repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all movies, ordered by name ascending.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY name ASC");
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list movies")?;

        Ok(movies)
    }

    /// Get a movie by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ?");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch movie")?;

        Ok(movie)
    }

    /// Check if a movie exists by ID.
    #[instrument(skip(self))]
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check movie existence")?;

        Ok(count.0 > 0)
    }

    /// Check if a movie exists by name (case-insensitive, trimmed).
    #[instrument(skip(self))]
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies WHERE name = ?")
            .bind(name.trim())
            .fetch_one(&self.pool)
            .await
            .context("Failed to check movie name")?;

        Ok(count.0 > 0)
    }

    /// Create a new movie.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: &CreateMovieRequest) -> Result<Movie> {
        debug!("Creating movie: {}", request.name);

        let result = sqlx::query(
            r#"
            INSERT INTO movies (name, description, duration_minutes, image_path, rating, category_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.name.trim())
        .bind(request.description.as_deref().unwrap_or(""))
        .bind(request.duration_minutes)
        .bind(&request.image_path)
        .bind(request.rating)
        .bind(request.category_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e
                && db.is_unique_violation()
            {
                return anyhow!("Movie '{}' already exists.", request.name.trim());
            }
            anyhow::Error::new(e).context("Failed to insert movie")
        })?;

        self.get(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow!("Movie not found after creation"))
    }

    /// Update a movie.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i64, request: &UpdateMovieRequest) -> Result<Movie> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET name = ?, description = ?, duration_minutes = ?, image_path = ?,
                rating = ?, category_id = ?
            WHERE id = ?
            "#,
        )
        .bind(request.name.trim())
        .bind(request.description.as_deref().unwrap_or(""))
        .bind(request.duration_minutes)
        .bind(&request.image_path)
        .bind(request.rating)
        .bind(request.category_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e
                && db.is_unique_violation()
            {
                return anyhow!("Movie '{}' already exists.", request.name.trim());
            }
            anyhow::Error::new(e).context("Failed to update movie")
        })?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Movie not found: {}", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| anyhow!("Movie not found after update"))
    }

    /// Delete a movie.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete movie")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Movie not found: {}", id));
        }

        Ok(())
    }

    /// List movies in a category, ordered by name ascending.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE category_id = ? ORDER BY name ASC");
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list movies by category")?;

        Ok(movies)
    }

    /// Search movies whose name or description contains the given text.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<Movie>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE name LIKE ? OR description LIKE ? ORDER BY name ASC"
        );
        let pattern = format!("%{}%", text);
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .context("Failed to search movies")?;

        Ok(movies)
    }
}
