//! Review storage abstraction
//!
//! One interface over the places reviews can live. The in-memory backend is
//! used for development and tests; the PostgreSQL backend for deployments.
//! Consumers such as the community service only ever see this trait.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{MovieId, NewReview, Review, ReviewUpdate},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryReviewStore;
pub use postgres::PgReviewStore;

/// Trait for review storage backends
///
/// Backends must enforce at most one review per (author, movie) pair and
/// only let the author edit or delete a review.
#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    /// Every stored review, in no particular order
    async fn list_all_reviews(&self) -> AppResult<Vec<Review>>;

    /// Reviews for one movie, newest first
    async fn list_reviews_for_movie(&self, movie_id: MovieId) -> AppResult<Vec<Review>>;

    /// Reviews written by one user, newest first
    async fn list_reviews_for_user(&self, author_id: Uuid) -> AppResult<Vec<Review>>;

    async fn get_review(&self, review_id: Uuid) -> AppResult<Review>;

    /// Stores a new review
    ///
    /// Returns `AppError::Conflict` if the author already reviewed the movie.
    async fn create_review(&self, author_id: Uuid, review: NewReview) -> AppResult<Review>;

    /// Overwrites rating and comment of an existing review
    ///
    /// Returns `AppError::NotFound` for an unknown id and `AppError::Forbidden`
    /// when `author_id` did not write the review.
    async fn update_review(
        &self,
        review_id: Uuid,
        author_id: Uuid,
        update: ReviewUpdate,
    ) -> AppResult<Review>;

    /// Removes a review, with the same error rules as `update_review`
    async fn delete_review(&self, review_id: Uuid, author_id: Uuid) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

pub(crate) fn duplicate_review_message(movie_id: MovieId) -> String {
    format!("You have already reviewed movie {}", movie_id)
}

pub(crate) fn review_not_found_message(review_id: Uuid) -> String {
    format!("Review {} not found", review_id)
}

pub(crate) fn not_author_message(review_id: Uuid) -> String {
    format!("Review {} belongs to another user", review_id)
}
