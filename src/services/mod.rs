pub mod aggregator;
pub mod catalog;
pub mod community;
pub mod favorites;
pub mod home;
pub mod reviews;
pub mod sessions;
pub mod storage;
pub mod users;

pub use aggregator::{aggregate, AggregateOptions};
pub use catalog::{CatalogProvider, TmdbProvider};
pub use community::CommunityService;
pub use favorites::{FavoriteStore, InMemoryFavoriteStore, PgFavoriteStore};
pub use reviews::{InMemoryReviewStore, PgReviewStore, ReviewStore};
pub use sessions::SessionRegistry;
pub use storage::Storage;
pub use users::{InMemoryUserStore, PgUserStore, UserStore};
