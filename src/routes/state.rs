use std::sync::Arc;

use crate::services::{
    CatalogProvider, CommunityService, FavoriteStore, ReviewStore, SessionRegistry, Storage,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<dyn ReviewStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub community: CommunityService,
    pub catalog: Arc<dyn CatalogProvider>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Wires sessions and the community service to the given storage backend
    pub fn new(storage: Storage, catalog: Arc<dyn CatalogProvider>) -> Self {
        tracing::info!(backend = storage.backend(), "Using storage backend");

        Self {
            community: CommunityService::new(storage.reviews.clone()),
            sessions: Arc::new(SessionRegistry::new(storage.users)),
            reviews: storage.reviews,
            favorites: storage.favorites,
            catalog,
        }
    }
}
