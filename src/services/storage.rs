use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{
    favorites::{FavoriteStore, InMemoryFavoriteStore, PgFavoriteStore},
    reviews::{InMemoryReviewStore, PgReviewStore, ReviewStore},
    users::{InMemoryUserStore, PgUserStore, UserStore},
};

/// Persistent stores, always from the same backend
///
/// Reviews and favorites reference user ids, so accounts must survive
/// exactly as long as the rows that point at them.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub favorites: Arc<dyn FavoriteStore>,
}

impl Storage {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            reviews: Arc::new(InMemoryReviewStore::new()),
            favorites: Arc::new(InMemoryFavoriteStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            reviews: Arc::new(PgReviewStore::new(pool.clone())),
            favorites: Arc::new(PgFavoriteStore::new(pool)),
        }
    }

    /// Backend name shared by every store
    pub fn backend(&self) -> &'static str {
        self.reviews.name()
    }
}
