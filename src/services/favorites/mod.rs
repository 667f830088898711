//! Per-user movie bookmarks
//!
//! Favorites never feed ratings or rankings; they only back the user's own
//! list and the "is this bookmarked" check on a movie page.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Favorite, MovieId, NewFavorite},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryFavoriteStore;
pub use postgres::PgFavoriteStore;

/// Trait for favorite storage backends
#[async_trait::async_trait]
pub trait FavoriteStore: Send + Sync {
    /// A user's favorites, most recently added first
    async fn list_favorites(&self, user_id: Uuid) -> AppResult<Vec<Favorite>>;

    /// Bookmarks a movie, `AppError::Conflict` if it already is
    async fn add_favorite(&self, user_id: Uuid, favorite: NewFavorite) -> AppResult<Favorite>;

    /// Removes a bookmark, `AppError::NotFound` if there was none
    async fn remove_favorite(&self, user_id: Uuid, movie_id: MovieId) -> AppResult<()>;

    async fn is_favorite(&self, user_id: Uuid, movie_id: MovieId) -> AppResult<bool>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

pub(crate) fn already_favorite_message(movie_id: MovieId) -> String {
    format!("Movie {} is already in your favorites", movie_id)
}

pub(crate) fn not_favorite_message(movie_id: MovieId) -> String {
    format!("Movie {} is not in your favorites", movie_id)
}
