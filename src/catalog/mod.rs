//! Catalog module.
//!
//! Categories and movies: models, repositories, and the catalog service.

mod models;
mod repository;
mod service;

pub use models::{
    Category, CreateCategoryRequest, CreateMovieRequest, Movie, Rating, UpdateCategoryRequest,
    UpdateMovieRequest,
};
pub use repository::{CategoryRepository, MovieRepository};
pub use service::CatalogService;
