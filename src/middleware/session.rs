use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::{error::AppError, models::SessionContext, routes::AppState};

/// Session of the authenticated caller
///
/// Extracting it rejects the request with 401 unless the
/// `Authorization: Bearer <token>` header names an open session.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionContext);

/// Pulls the session token out of an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized("Missing or malformed bearer token".to_string())
        })?;

        let session = state.sessions.load(token).await?;
        Ok(CurrentSession(session))
    }
}
