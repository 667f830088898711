use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod auth;
pub mod community;
pub mod favorites;
pub mod movies;
pub mod reviews;
pub mod state;

pub use state::AppState;

/// Success envelope shared by every API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Wraps `data` in a success envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Session
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me).put(auth::update_me))
        .route("/auth/session", delete(auth::logout))
        // Catalog
        .route("/movies/popular", get(movies::popular))
        .route("/movies/top-rated", get(movies::top_rated))
        .route("/movies/search", get(movies::search))
        .route("/movies/:movie_id", get(movies::details))
        .route("/home", get(movies::home))
        // Community
        .route("/community/top-rated", get(community::top_rated))
        // Favorites
        .route("/favorites", get(favorites::list).post(favorites::add))
        .route("/favorites/check/:movie_id", get(favorites::check))
        .route("/favorites/:movie_id", delete(favorites::remove))
        // Reviews
        .route("/reviews", get(reviews::list_all).post(reviews::create))
        .route("/reviews/movie/:movie_id", get(reviews::list_for_movie))
        .route("/reviews/user/:user_id", get(reviews::list_for_user))
        .route(
            "/reviews/:review_id",
            get(reviews::get_one)
                .put(reviews::update)
                .delete(reviews::remove),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
