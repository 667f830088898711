use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::{CurrentSession, RequestId},
    models::{NewUser, ProfileUpdate, SessionContext, User},
    routes::{ok, ApiResponse, AppState},
};

/// Returned on registration and login; `token` goes in `Authorization: Bearer`
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: Uuid,
}

/// Sign-in payload; credentials are checked by the upstream identity provider
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

impl From<SessionContext> for SessionResponse {
    fn from(session: SessionContext) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<NewUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<SessionResponse>>)> {
    tracing::info!(request_id = %request_id, username = %request.username, "Registering user");

    let session = state.sessions.register(request).await?;

    Ok((StatusCode::CREATED, ok(SessionResponse::from(session))))
}

/// Opens a new session for an existing account
pub async fn login(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    let session = state.sessions.login(&request.email).await?;

    tracing::info!(request_id = %request_id, user_id = %session.user_id(), "Session opened");

    Ok(ok(SessionResponse::from(session)))
}

pub async fn me(CurrentSession(session): CurrentSession) -> Json<ApiResponse<User>> {
    ok(session.user)
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentSession(session): CurrentSession,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.sessions.update_profile(session.user_id(), update).await?;

    tracing::info!(request_id = %request_id, user_id = %user.id, "Profile updated");

    Ok(ok(user))
}

/// Ends the caller's session
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    state.sessions.clear(session.token).await;
    StatusCode::NO_CONTENT
}
