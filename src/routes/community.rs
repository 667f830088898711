use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Rating, RankedEntry},
    routes::{ok, ApiResponse, AppState},
    services::AggregateOptions,
};

/// Upper bound on `limit` for a single community ranking
pub const MAX_COMMUNITY_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct TopRatedQuery {
    pub limit: Option<usize>,
    pub min_rating: Option<f64>,
    pub min_reviews: Option<usize>,
}

impl TryFrom<TopRatedQuery> for AggregateOptions {
    type Error = AppError;

    fn try_from(query: TopRatedQuery) -> Result<Self, Self::Error> {
        let mut options = AggregateOptions::community();

        if let Some(limit) = query.limit {
            if !(1..=MAX_COMMUNITY_LIMIT).contains(&limit) {
                return Err(AppError::InvalidInput(format!(
                    "limit must be between 1 and {}",
                    MAX_COMMUNITY_LIMIT
                )));
            }
            options.top_n = limit;
        }

        if let Some(min_rating) = query.min_rating {
            if !min_rating.is_finite() || !(0.0..=f64::from(Rating::MAX)).contains(&min_rating) {
                return Err(AppError::InvalidInput(format!(
                    "min_rating must be between 0 and {}",
                    Rating::MAX
                )));
            }
            options.min_mean_rating = min_rating;
        }

        if let Some(min_reviews) = query.min_reviews {
            options = options.with_min_review_count(min_reviews.max(1));
        }

        Ok(options)
    }
}

/// Community ranking by mean review rating
pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<TopRatedQuery>,
) -> AppResult<Json<ApiResponse<Vec<RankedEntry>>>> {
    let options = AggregateOptions::try_from(query)?;
    let entries = state.community.top_rated(options).await?;
    Ok(ok(RankedEntry::rank_all(entries)))
}
