use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{duplicate_review_message, not_author_message, review_not_found_message, ReviewStore};
use crate::{
    error::{AppError, AppResult},
    models::{sort_newest_first, MovieId, NewReview, Review, ReviewUpdate},
};

/// Process-local review store
///
/// Last write wins; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<HashMap<Uuid, Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with existing reviews
    pub fn with_reviews(reviews: impl IntoIterator<Item = Review>) -> Self {
        Self {
            reviews: RwLock::new(reviews.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    fn check_author(review: &Review, author_id: Uuid) -> AppResult<()> {
        if review.is_authored_by(author_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(not_author_message(review.id)))
        }
    }
}

#[async_trait::async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn list_all_reviews(&self) -> AppResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.values().cloned().collect())
    }

    async fn list_reviews_for_movie(&self, movie_id: MovieId) -> AppResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        Ok(matching)
    }

    async fn list_reviews_for_user(&self, author_id: Uuid) -> AppResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|r| r.is_authored_by(author_id))
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        Ok(matching)
    }

    async fn get_review(&self, review_id: Uuid) -> AppResult<Review> {
        let reviews = self.reviews.read().await;
        reviews
            .get(&review_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(review_not_found_message(review_id)))
    }

    async fn create_review(&self, author_id: Uuid, review: NewReview) -> AppResult<Review> {
        let mut reviews = self.reviews.write().await;

        let already_reviewed = reviews
            .values()
            .any(|r| r.is_authored_by(author_id) && r.movie_id == review.movie_id);
        if already_reviewed {
            return Err(AppError::Conflict(duplicate_review_message(review.movie_id)));
        }

        let review = Review::new(author_id, review);
        reviews.insert(review.id, review.clone());

        tracing::debug!(
            review_id = %review.id,
            movie_id = review.movie_id,
            store = "memory",
            "Review created"
        );

        Ok(review)
    }

    async fn update_review(
        &self,
        review_id: Uuid,
        author_id: Uuid,
        update: ReviewUpdate,
    ) -> AppResult<Review> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(&review_id)
            .ok_or_else(|| AppError::NotFound(review_not_found_message(review_id)))?;

        Self::check_author(review, author_id)?;
        review.apply(update);

        Ok(review.clone())
    }

    async fn delete_review(&self, review_id: Uuid, author_id: Uuid) -> AppResult<()> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get(&review_id)
            .ok_or_else(|| AppError::NotFound(review_not_found_message(review_id)))?;

        Self::check_author(review, author_id)?;
        reviews.remove(&review_id);

        tracing::debug!(review_id = %review_id, store = "memory", "Review deleted");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
