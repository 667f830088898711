use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{duplicate_review_message, not_author_message, review_not_found_message, ReviewStore};
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, NewReview, Rating, Review, ReviewUpdate},
};

const REVIEW_COLUMNS: &str = "id, movie_id, movie_title, movie_poster_path, rating, comment, \
                              author_id, created_at, updated_at";

/// Row shape of the `reviews` table
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    movie_id: i64,
    movie_title: String,
    movie_poster_path: Option<String>,
    rating: i16,
    comment: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = AppError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        // Rows that slipped past the CHECK constraint are refused, not clamped
        let rating = Rating::new(i64::from(row.rating)).map_err(|e| {
            tracing::error!(review_id = %row.id, error = %e, "Corrupt review row");
            AppError::Internal(format!("Review {} has an invalid rating: {}", row.id, e))
        })?;

        Ok(Review {
            id: row.id,
            movie_id: row.movie_id,
            movie_title: row.movie_title,
            movie_poster_path: row.movie_poster_path,
            rating,
            comment: row.comment,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_reviews(rows: Vec<ReviewRow>) -> AppResult<Vec<Review>> {
    rows.into_iter().map(Review::try_from).collect()
}

/// Review store backed by PostgreSQL
///
/// The `(author_id, movie_id)` unique index enforces one review per user
/// per movie.
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Works out why a write guarded by `author_id` touched no rows
    async fn missing_or_forbidden(&self, review_id: Uuid) -> AppError {
        let owner: Result<Option<Uuid>, sqlx::Error> =
            sqlx::query_scalar("SELECT author_id FROM reviews WHERE id = $1")
                .bind(review_id)
                .fetch_optional(&self.pool)
                .await;

        match owner {
            Ok(Some(_)) => AppError::Forbidden(not_author_message(review_id)),
            Ok(None) => AppError::NotFound(review_not_found_message(review_id)),
            Err(e) => AppError::Database(e),
        }
    }
}

#[async_trait::async_trait]
impl ReviewStore for PgReviewStore {
    async fn list_all_reviews(&self) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {} FROM reviews",
            REVIEW_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        into_reviews(rows)
    }

    async fn list_reviews_for_movie(&self, movie_id: MovieId) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {} FROM reviews WHERE movie_id = $1 ORDER BY created_at DESC, id",
            REVIEW_COLUMNS
        ))
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        into_reviews(rows)
    }

    async fn list_reviews_for_user(&self, author_id: Uuid) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {} FROM reviews WHERE author_id = $1 ORDER BY created_at DESC, id",
            REVIEW_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        into_reviews(rows)
    }

    async fn get_review(&self, review_id: Uuid) -> AppResult<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {} FROM reviews WHERE id = $1",
            REVIEW_COLUMNS
        ))
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(review_not_found_message(review_id)))?;

        row.try_into()
    }

    async fn create_review(&self, author_id: Uuid, review: NewReview) -> AppResult<Review> {
        let movie_id = review.movie_id;
        let review = Review::new(author_id, review);

        let inserted = sqlx::query_as::<_, ReviewRow>(&format!(
            "INSERT INTO reviews ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {cols}",
            cols = REVIEW_COLUMNS
        ))
        .bind(review.id)
        .bind(review.movie_id)
        .bind(&review.movie_title)
        .bind(&review.movie_poster_path)
        .bind(i16::from(review.rating.value()))
        .bind(&review.comment)
        .bind(review.author_id)
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => {
                tracing::debug!(review_id = %row.id, movie_id, store = "postgres", "Review created");
                row.try_into()
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict(duplicate_review_message(movie_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_review(
        &self,
        review_id: Uuid,
        author_id: Uuid,
        update: ReviewUpdate,
    ) -> AppResult<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "UPDATE reviews SET rating = $1, comment = $2, updated_at = NOW() \
             WHERE id = $3 AND author_id = $4 RETURNING {}",
            REVIEW_COLUMNS
        ))
        .bind(i16::from(update.rating.value()))
        .bind(&update.comment)
        .bind(review_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(self.missing_or_forbidden(review_id).await),
        }
    }

    async fn delete_review(&self, review_id: Uuid, author_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1 AND author_id = $2")
            .bind(review_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_forbidden(review_id).await);
        }

        tracing::debug!(review_id = %review_id, store = "postgres", "Review deleted");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
