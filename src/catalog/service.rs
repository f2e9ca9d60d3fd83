//! Catalog service for business logic.

use anyhow::{Result, bail};
use tracing::{info, instrument};

use super::models::{Category, CreateMovieRequest, Movie, UpdateMovieRequest};
use super::repository::{CategoryRepository, MovieRepository};

/// Service for catalog management.
#[derive(Debug, Clone)]
pub struct CatalogService {
    categories: CategoryRepository,
    movies: MovieRepository,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(categories: CategoryRepository, movies: MovieRepository) -> Self {
        Self { categories, movies }
    }

    /// List all categories.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    /// Get a category by ID.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.categories.get(id).await
    }

    /// Create a new category.
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Invalid category name: must not be empty.");
        }

        if self.categories.exists_by_name(name).await? {
            bail!("Category '{}' already exists.", name);
        }

        let category = self.categories.create(name).await?;
        info!(category_id = category.id, name = %category.name, "Created category");

        Ok(category)
    }

    /// Update a category name.
    #[instrument(skip(self))]
    pub async fn update_category(&self, id: i64, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Invalid category name: must not be empty.");
        }

        if !self.categories.exists(id).await? {
            bail!("Category not found: {}", id);
        }

        let category = self.categories.update(id, name).await?;
        info!(category_id = id, "Updated category");

        Ok(category)
    }

    /// Delete a category. Categories that still contain movies cannot be
    /// deleted.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        if !self.categories.exists(id).await? {
            bail!("Category not found: {}", id);
        }

        if !self.movies.list_by_category(id).await?.is_empty() {
            bail!("Cannot delete category {}: it still has movies.", id);
        }

        self.categories.delete(id).await?;
        info!(category_id = id, "Deleted category");

        Ok(())
    }

    /// List all movies.
    #[instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movies.list().await
    }

    /// Get a movie by ID.
    #[instrument(skip(self))]
    pub async fn get_movie(&self, id: i64) -> Result<Option<Movie>> {
        self.movies.get(id).await
    }

    /// Create a new movie.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_movie(&self, request: CreateMovieRequest) -> Result<Movie> {
        validate_movie(&request.name, request.duration_minutes)?;

        if self.movies.exists_by_name(&request.name).await? {
            bail!("Movie '{}' already exists.", request.name.trim());
        }

        if !self.categories.exists(request.category_id).await? {
            bail!("Category not found: {}", request.category_id);
        }

        let movie = self.movies.create(&request).await?;
        info!(movie_id = movie.id, name = %movie.name, "Created movie");

        Ok(movie)
    }

    /// Update a movie.
    #[instrument(skip(self, request))]
    pub async fn update_movie(&self, id: i64, request: UpdateMovieRequest) -> Result<Movie> {
        validate_movie(&request.name, request.duration_minutes)?;

        if !self.movies.exists(id).await? {
            bail!("Movie not found: {}", id);
        }

        if !self.categories.exists(request.category_id).await? {
            bail!("Category not found: {}", request.category_id);
        }

        let movie = self.movies.update(id, &request).await?;
        info!(movie_id = id, "Updated movie");

        Ok(movie)
    }

    /// Delete a movie.
    #[instrument(skip(self))]
    pub async fn delete_movie(&self, id: i64) -> Result<()> {
        if !self.movies.exists(id).await? {
            bail!("Movie not found: {}", id);
        }

        self.movies.delete(id).await?;
        info!(movie_id = id, "Deleted movie");

        Ok(())
    }

    /// List movies in a category.
    #[instrument(skip(self))]
    pub async fn movies_by_category(&self, category_id: i64) -> Result<Vec<Movie>> {
        if !self.categories.exists(category_id).await? {
            bail!("Category not found: {}", category_id);
        }

        self.movies.list_by_category(category_id).await
    }

    /// Search movies by name or description substring.
    #[instrument(skip(self))]
    pub async fn search_movies(&self, text: &str) -> Result<Vec<Movie>> {
        self.movies.search(text).await
    }
}

fn validate_movie(name: &str, duration_minutes: i64) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Invalid movie name: must not be empty.");
    }
    if duration_minutes <= 0 {
        bail!("Movie duration must be a positive number of minutes.");
    }
    Ok(())
}
