use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{already_favorite_message, not_favorite_message, FavoriteStore};
use crate::{
    error::{AppError, AppResult},
    models::{sort_recently_added_first, Favorite, MovieId, NewFavorite},
};

/// Process-local favorites keyed by (user, movie)
#[derive(Default)]
pub struct InMemoryFavoriteStore {
    favorites: RwLock<HashMap<(Uuid, MovieId), Favorite>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn list_favorites(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let favorites = self.favorites.read().await;
        let mut matching: Vec<Favorite> = favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        sort_recently_added_first(&mut matching);
        Ok(matching)
    }

    async fn add_favorite(&self, user_id: Uuid, favorite: NewFavorite) -> AppResult<Favorite> {
        let mut favorites = self.favorites.write().await;
        let key = (user_id, favorite.movie_id);

        if favorites.contains_key(&key) {
            return Err(AppError::Conflict(already_favorite_message(favorite.movie_id)));
        }

        let favorite = Favorite::new(user_id, favorite);
        favorites.insert(key, favorite.clone());

        tracing::debug!(
            user_id = %user_id,
            movie_id = favorite.movie_id,
            store = "memory",
            "Favorite added"
        );

        Ok(favorite)
    }

    async fn remove_favorite(&self, user_id: Uuid, movie_id: MovieId) -> AppResult<()> {
        self.favorites
            .write()
            .await
            .remove(&(user_id, movie_id))
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(not_favorite_message(movie_id)))
    }

    async fn is_favorite(&self, user_id: Uuid, movie_id: MovieId) -> AppResult<bool> {
        Ok(self.favorites.read().await.contains_key(&(user_id, movie_id)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
