use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{already_favorite_message, not_favorite_message, FavoriteStore};
use crate::{
    error::{AppError, AppResult},
    models::{Favorite, MovieId, NewFavorite},
};

const FAVORITE_COLUMNS: &str =
    "id, user_id, movie_id, movie_title, movie_poster_path, movie_release_date, added_at";

#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    id: Uuid,
    user_id: Uuid,
    movie_id: i64,
    movie_title: String,
    movie_poster_path: Option<String>,
    movie_release_date: Option<String>,
    added_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            movie_title: row.movie_title,
            movie_poster_path: row.movie_poster_path,
            movie_release_date: row.movie_release_date,
            added_at: row.added_at,
        }
    }
}

/// Favorite store backed by PostgreSQL, unique on `(user_id, movie_id)`
#[derive(Clone)]
pub struct PgFavoriteStore {
    pool: PgPool,
}

impl PgFavoriteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FavoriteStore for PgFavoriteStore {
    async fn list_favorites(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(&format!(
            "SELECT {} FROM favorites WHERE user_id = $1 ORDER BY added_at DESC, id",
            FAVORITE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    async fn add_favorite(&self, user_id: Uuid, favorite: NewFavorite) -> AppResult<Favorite> {
        let movie_id = favorite.movie_id;
        let favorite = Favorite::new(user_id, favorite);

        let inserted = sqlx::query_as::<_, FavoriteRow>(&format!(
            "INSERT INTO favorites ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = FAVORITE_COLUMNS
        ))
        .bind(favorite.id)
        .bind(favorite.user_id)
        .bind(favorite.movie_id)
        .bind(&favorite.movie_title)
        .bind(&favorite.movie_poster_path)
        .bind(&favorite.movie_release_date)
        .bind(favorite.added_at)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => {
                tracing::debug!(user_id = %user_id, movie_id, store = "postgres", "Favorite added");
                Ok(row.into())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict(already_favorite_message(movie_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_favorite(&self, user_id: Uuid, movie_id: MovieId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(not_favorite_message(movie_id)));
        }
        Ok(())
    }

    async fn is_favorite(&self, user_id: Uuid, movie_id: MovieId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND movie_id = $2)",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
