//! Catalog models: categories and movies.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Age rating of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Rating {
    SevenPlus,
    ThirteenPlus,
    SixteenPlus,
    EighteenPlus,
}

/// A movie category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// A movie in the catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_minutes: i64,
    pub image_path: Option<String>,
    pub rating: Rating,
    pub category_id: i64,
    pub created_at: String,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Request body for updating a category. The `id` must match the path.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: i64,
    pub name: String,
}

/// Request body for creating a movie.
#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub image_path: Option<String>,
    pub rating: Rating,
    pub category_id: i64,
}

/// Request body for updating a movie. The `id` must match the path.
#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub image_path: Option<String>,
    pub rating: Rating,
    pub category_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_serde() {
        assert_eq!(
            serde_json::to_string(&Rating::ThirteenPlus).unwrap(),
            "\"thirteen_plus\""
        );
        assert_eq!(
            serde_json::from_str::<Rating>("\"eighteen_plus\"").unwrap(),
            Rating::EighteenPlus
        );
        assert!(serde_json::from_str::<Rating>("\"pg\"").is_err());
    }
}
