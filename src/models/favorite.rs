use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MovieId;

/// A movie a user bookmarked; at most one per (user, movie)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: MovieId,
    pub movie_title: String,
    pub movie_poster_path: Option<String>,
    pub movie_release_date: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Catalog fields captured when a movie is bookmarked
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub movie_id: MovieId,
    pub movie_title: String,
    pub movie_poster_path: Option<String>,
    pub movie_release_date: Option<String>,
}

impl Favorite {
    pub fn new(user_id: Uuid, favorite: NewFavorite) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            movie_id: favorite.movie_id,
            movie_title: favorite.movie_title,
            movie_poster_path: favorite.movie_poster_path,
            movie_release_date: favorite.movie_release_date,
            added_at: Utc::now(),
        }
    }
}

/// Most recently added first, id as a stable fallback
pub fn sort_recently_added_first(favorites: &mut [Favorite]) {
    favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at).then_with(|| a.id.cmp(&b.id)));
}
