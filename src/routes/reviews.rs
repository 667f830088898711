use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentSession, RequestId},
    models::{sort_newest_first, MovieId, NewReview, Rating, Review, ReviewUpdate, UNKNOWN_MOVIE_TITLE},
    routes::{ok, ApiResponse, AppState},
};

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub movie_id: MovieId,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub movie_poster_path: Option<String>,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TryFrom<CreateReviewRequest> for NewReview {
    type Error = AppError;

    fn try_from(request: CreateReviewRequest) -> Result<Self, Self::Error> {
        if request.movie_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Invalid movie id {}",
                request.movie_id
            )));
        }

        let movie_title = request
            .movie_title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNKNOWN_MOVIE_TITLE.to_string());

        Ok(NewReview {
            movie_id: request.movie_id,
            movie_title,
            movie_poster_path: request.movie_poster_path,
            rating: Rating::try_from(request.rating)?,
            comment: request.comment.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TryFrom<UpdateReviewRequest> for ReviewUpdate {
    type Error = AppError;

    fn try_from(request: UpdateReviewRequest) -> Result<Self, Self::Error> {
        Ok(ReviewUpdate {
            rating: Rating::try_from(request.rating)?,
            comment: request.comment.unwrap_or_default(),
        })
    }
}

/// Every review, newest first
pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let mut reviews = state.reviews.list_all_reviews().await?;
    sort_newest_first(&mut reviews);
    Ok(ok(reviews))
}

/// Reviews for one movie
pub async fn list_for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let reviews = state.reviews.list_reviews_for_movie(movie_id).await?;
    Ok(ok(reviews))
}

/// Reviews written by one user
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let reviews = state.reviews.list_reviews_for_user(user_id).await?;
    Ok(ok(reviews))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = state.reviews.get_review(review_id).await?;
    Ok(ok(review))
}

/// Submit a review as the current user
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let new_review = NewReview::try_from(request)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %session.user_id(),
        movie_id = new_review.movie_id,
        rating = new_review.rating.value(),
        "Creating review"
    );

    let review = state
        .reviews
        .create_review(session.user_id(), new_review)
        .await?;

    Ok((StatusCode::CREATED, ok(review)))
}

/// Edit one of the current user's reviews
pub async fn update(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(review_id): Path<Uuid>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let update = ReviewUpdate::try_from(request)?;

    let review = state
        .reviews
        .update_review(review_id, session.user_id(), update)
        .await?;

    tracing::info!(
        request_id = %request_id,
        review_id = %review_id,
        user_id = %session.user_id(),
        "Review updated"
    );

    Ok(ok(review))
}

/// Delete one of the current user's reviews
pub async fn remove(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(review_id): Path<Uuid>,
    CurrentSession(session): CurrentSession,
) -> AppResult<StatusCode> {
    state
        .reviews
        .delete_review(review_id, session.user_id())
        .await?;

    tracing::info!(
        request_id = %request_id,
        review_id = %review_id,
        user_id = %session.user_id(),
        "Review deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
