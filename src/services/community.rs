use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{AggregateRatingEntry, MovieId, MovieRatingSummary},
    services::{
        aggregator::{self, AggregateOptions},
        reviews::ReviewStore,
    },
};

/// Community rankings computed from the review store
///
/// Every ranking reads the full review collection and aggregates it here,
/// so all surfaces (home strip, community list, top-rated page) agree.
#[derive(Clone)]
pub struct CommunityService {
    store: Arc<dyn ReviewStore>,
}

impl CommunityService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    /// Top-N movies by community mean rating
    pub async fn top_rated(&self, options: AggregateOptions) -> AppResult<Vec<AggregateRatingEntry>> {
        let reviews = self.store.list_all_reviews().await?;
        let entries = aggregator::aggregate(&reviews, &options);

        tracing::info!(
            store = self.store.name(),
            reviews = reviews.len(),
            returned = entries.len(),
            top_n = options.top_n,
            "Community ranking computed"
        );

        Ok(entries)
    }

    /// Community mean and review count for one movie
    pub async fn movie_summary(&self, movie_id: MovieId) -> AppResult<MovieRatingSummary> {
        let reviews = self.store.list_reviews_for_movie(movie_id).await?;
        Ok(aggregator::summarize(movie_id, &reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewReview, Rating};
    use crate::services::reviews::InMemoryReviewStore;
    use uuid::Uuid;

    async fn seeded_service(ratings: &[(MovieId, i64)]) -> CommunityService {
        let store = Arc::new(InMemoryReviewStore::new());
        for (movie_id, rating) in ratings {
            store
                .create_review(
                    Uuid::new_v4(),
                    NewReview {
                        movie_id: *movie_id,
                        movie_title: format!("Movie {}", movie_id),
                        movie_poster_path: None,
                        rating: Rating::new(*rating).unwrap(),
                        comment: String::new(),
                    },
                )
                .await
                .unwrap();
        }
        CommunityService::new(store)
    }

    #[tokio::test]
    async fn test_top_rated_uses_store_contents() {
        let service = seeded_service(&[(1, 5), (1, 3), (2, 2)]).await;
        let entries = service.top_rated(AggregateOptions::community()).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].movie_id, 1);
        assert_eq!(entries[0].mean_rating, 4.0);
        assert_eq!(entries[0].review_count, 2);
    }

    #[tokio::test]
    async fn test_top_rated_respects_preset_size() {
        let ratings: Vec<(MovieId, i64)> = (1..=8).map(|id| (id, 4)).collect();
        let service = seeded_service(&ratings).await;

        let home = service.top_rated(AggregateOptions::home()).await.unwrap();
        assert_eq!(home.len(), 5);

        let page = service
            .top_rated(AggregateOptions::top_rated_page())
            .await
            .unwrap();
        assert_eq!(page.len(), 8);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let service = seeded_service(&[]).await;
        assert!(service
            .top_rated(AggregateOptions::community())
            .await
            .unwrap()
            .is_empty());

        let summary = service.movie_summary(1).await.unwrap();
        assert_eq!(summary.review_count, 0);
        assert_eq!(summary.mean_rating, None);
    }

    #[tokio::test]
    async fn test_movie_summary() {
        let service = seeded_service(&[(3, 2), (3, 1), (4, 5)]).await;
        let summary = service.movie_summary(3).await.unwrap();
        assert_eq!(summary.review_count, 2);
        assert_eq!(summary.mean_rating, Some(1.5));
    }
}
