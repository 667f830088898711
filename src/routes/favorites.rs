use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentSession, RequestId},
    models::{Favorite, MovieId, NewFavorite, UNKNOWN_MOVIE_TITLE},
    routes::{ok, ApiResponse, AppState},
};

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub movie_id: MovieId,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub movie_poster_path: Option<String>,
    #[serde(default)]
    pub movie_release_date: Option<String>,
}

impl TryFrom<AddFavoriteRequest> for NewFavorite {
    type Error = AppError;

    fn try_from(request: AddFavoriteRequest) -> Result<Self, Self::Error> {
        if request.movie_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Invalid movie id {}",
                request.movie_id
            )));
        }

        Ok(NewFavorite {
            movie_id: request.movie_id,
            movie_title: request
                .movie_title
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNKNOWN_MOVIE_TITLE.to_string()),
            movie_poster_path: request.movie_poster_path,
            movie_release_date: request.movie_release_date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub movie_id: MovieId,
    pub is_favorite: bool,
}

/// The caller's favorites, most recently added first
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<Vec<Favorite>>>> {
    let favorites = state.favorites.list_favorites(session.user_id()).await?;
    Ok(ok(favorites))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Favorite>>)> {
    let favorite = NewFavorite::try_from(request)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %session.user_id(),
        movie_id = favorite.movie_id,
        "Adding favorite"
    );

    let favorite = state
        .favorites
        .add_favorite(session.user_id(), favorite)
        .await?;

    Ok((StatusCode::CREATED, ok(favorite)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    CurrentSession(session): CurrentSession,
) -> AppResult<StatusCode> {
    state
        .favorites
        .remove_favorite(session.user_id(), movie_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether the caller bookmarked a movie
pub async fn check(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let is_favorite = state
        .favorites
        .is_favorite(session.user_id(), movie_id)
        .await?;

    Ok(ok(FavoriteStatus {
        movie_id,
        is_favorite,
    }))
}
