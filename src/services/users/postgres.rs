use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{identity_taken_message, user_not_found_message, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{ProfileUpdate, User},
};

const USER_COLUMNS: &str = "id, username, email, bio, avatar_url, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            bio: row.bio,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
        }
    }
}

/// Maps a write that hit a unique index to `Conflict`
fn conflict_or_database(err: sqlx::Error, username: &str) -> AppError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(identity_taken_message(username))
        }
        other => other.into(),
    }
}

/// Account store backed by the `users` table
///
/// Case-insensitive uniqueness is enforced by indexes on `LOWER(username)`
/// and `LOWER(email)`.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: User) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, &user.username))?;

        Ok(row.into())
    }

    async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(user_not_found_message(user_id)))?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_user(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let mut user = self.get_user(user_id).await?;
        user.apply(update);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET username = $1, bio = $2, avatar_url = $3 WHERE id = $4 \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, &user.username))?
        .ok_or_else(|| AppError::NotFound(user_not_found_message(user_id)))?;

        Ok(row.into())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
