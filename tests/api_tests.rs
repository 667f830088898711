use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use cinereview_api::{
    error::{AppError, AppResult},
    models::{Movie, MovieDetails, MovieId, MoviePage},
    routes::{create_router, AppState},
    services::{CatalogProvider, Storage},
};

/// Fixed catalog so the router can be exercised without TMDB
struct StaticCatalog {
    movies: Vec<Movie>,
}

impl StaticCatalog {
    fn new() -> Self {
        let movies = [
            (155, "The Dark Knight", 8.5, 32000),
            (603, "The Matrix", 8.2, 25000),
            (550, "Fight Club", 8.4, 29000),
            (13, "Forrest Gump", 8.5, 27000),
            (9740, "Hannibal", 6.8, 4000),
        ]
        .into_iter()
        .map(|(id, title, vote_average, vote_count)| Movie {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: None,
            overview: String::new(),
            release_date: "1999-03-31".to_string(),
            vote_average,
            vote_count,
            genre_ids: vec![],
        })
        .collect();

        Self { movies }
    }

    fn page(&self, movies: Vec<Movie>) -> MoviePage {
        let total = movies.len() as u32;
        MoviePage {
            page: 1,
            results: movies,
            total_pages: 1,
            total_results: total,
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StaticCatalog {
    async fn popular_movies(&self, _page: u32) -> AppResult<MoviePage> {
        Ok(self.page(self.movies.clone()))
    }

    async fn top_rated_movies(&self, _page: u32) -> AppResult<MoviePage> {
        Ok(self.page(self.movies.clone()))
    }

    async fn search_movies(&self, query: &str, _page: u32) -> AppResult<MoviePage> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Search query must not be empty".to_string()));
        }
        let matches = self
            .movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&query))
            .cloned()
            .collect();
        Ok(self.page(matches))
    }

    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        let movie = self
            .movies
            .iter()
            .find(|movie| movie.id == movie_id)
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))?;

        Ok(MovieDetails {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            backdrop_path: None,
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            genres: vec![],
            runtime: Some(136),
            cast: vec![],
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn create_test_server() -> TestServer {
    let state = AppState::new(Storage::in_memory(), Arc::new(StaticCatalog::new()));
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Registers a user and returns their session token
async fn register(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username)
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn post_review(server: &TestServer, token: &str, movie_id: MovieId, rating: i64) -> Value {
    let response = server
        .post("/api/reviews")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&json!({
            "movie_id": movie_id,
            "movie_title": format!("Movie {}", movie_id),
            "rating": rating,
            "comment": "Seen it twice"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_register_and_fetch_profile() {
    let server = create_test_server();
    let token = register(&server, "neo").await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "neo");

    let response = server
        .put("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "bio": "Follows white rabbits" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["bio"], "Follows white rabbits");
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let server = create_test_server();
    register(&server, "trinity").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": "Trinity", "email": "other@example.com" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let server = create_test_server();
    let token = register(&server, "morpheus").await;

    server
        .delete("/api/auth/session")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_after_logout_restores_review_ownership() {
    let server = create_test_server();
    let token = register(&server, "morpheus").await;
    let created = post_review(&server, &token, 603, 3).await;
    let path = format!("/api/reviews/{}", created["data"]["id"].as_str().unwrap());

    server
        .delete("/api/auth/session")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "Morpheus@example.com" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["user"]["username"], "morpheus");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = server
        .put(&path)
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "rating": 5, "comment": "Free your mind" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["rating"], 5);
}

#[tokio::test]
async fn test_login_with_unknown_email_is_unauthorized() {
    let server = create_test_server();
    server
        .post("/api/auth/login")
        .json(&json!({ "email": "cypher@example.com" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_profile_fields_are_cleared() {
    let server = create_test_server();
    let token = register(&server, "oracle").await;

    server
        .put("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "bio": "Bakes cookies", "avatar_url": "/oracle.png" }))
        .await
        .assert_status_ok();

    let response = server
        .put("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "bio": "" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["bio"], Value::Null);
    assert_eq!(body["data"]["avatar_url"], "/oracle.png");
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let server = create_test_server();
    let token = register(&server, "neo").await;
    let other = register(&server, "switch").await;

    server
        .get("/api/favorites")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({
            "movie_id": 603,
            "movie_title": "The Matrix",
            "movie_release_date": "1999-03-31"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    server
        .post("/api/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movie_id": 603 }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let body: Value = server
        .get("/api/favorites/check/603")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(body["data"]["is_favorite"], true);

    let body: Value = server
        .get("/api/favorites/check/603")
        .add_header(AUTHORIZATION, bearer(&other))
        .await
        .json();
    assert_eq!(body["data"]["is_favorite"], false);

    let body: Value = server
        .get("/api/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(body["data"][0]["movie_title"], "The Matrix");

    server
        .delete("/api/favorites/603")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete("/api/favorites/603")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let body: Value = server
        .get("/api/favorites")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_create_review_requires_session() {
    let server = create_test_server();

    let response = server
        .post("/api/reviews")
        .json(&json!({ "movie_id": 603, "rating": 5 }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_and_list_reviews() {
    let server = create_test_server();
    let token = register(&server, "neo").await;

    let created = post_review(&server, &token, 603, 5).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["rating"], 5);
    let review_id = created["data"]["id"].as_str().unwrap().to_string();

    let response = server.get(&format!("/api/reviews/{}", review_id)).await;
    response.assert_status_ok();

    let response = server.get("/api/reviews/movie/603").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let author_id = created["data"]["author_id"].as_str().unwrap();
    let response = server.get(&format!("/api/reviews/user/{}", author_id)).await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["movie_id"], 603);

    let response = server.get("/api/reviews").await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_review_of_same_movie_conflicts() {
    let server = create_test_server();
    let token = register(&server, "neo").await;
    post_review(&server, &token, 603, 5).await;

    let response = server
        .post("/api/reviews")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movie_id": 603, "rating": 3 }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_out_of_range_rating_is_rejected() {
    let server = create_test_server();
    let token = register(&server, "neo").await;

    for rating in [0, 6, -1] {
        let response = server
            .post("/api/reviews")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "movie_id": 603, "rating": rating }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    let body: Value = server.get("/api/reviews").await.json();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_author_may_edit_or_delete() {
    let server = create_test_server();
    let author = register(&server, "neo").await;
    let stranger = register(&server, "smith").await;

    let created = post_review(&server, &author, 603, 4).await;
    let path = format!("/api/reviews/{}", created["data"]["id"].as_str().unwrap());

    server
        .put(&path)
        .add_header(AUTHORIZATION, bearer(&stranger))
        .json(&json!({ "rating": 1, "comment": "Overrated" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .delete(&path)
        .add_header(AUTHORIZATION, bearer(&stranger))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = server
        .put(&path)
        .add_header(AUTHORIZATION, bearer(&author))
        .json(&json!({ "rating": 5, "comment": "Better on rewatch" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["rating"], 5);
    assert_eq!(body["data"]["comment"], "Better on rewatch");

    server
        .delete(&path)
        .add_header(AUTHORIZATION, bearer(&author))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_community_top_rated_ranking() {
    let server = create_test_server();
    let first = register(&server, "neo").await;
    let second = register(&server, "trinity").await;

    // Movie 1 averages 4.0 over two reviews, movie 2 averages 2.0
    post_review(&server, &first, 1, 5).await;
    post_review(&server, &second, 1, 3).await;
    post_review(&server, &first, 2, 2).await;

    let response = server.get("/api/community/top-rated").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let entries = body["data"].as_array().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["movie_id"], 1);
    assert_eq!(entries[0]["mean_rating"], 4.0);
    assert_eq!(entries[0]["review_count"], 2);

    let response = server
        .get("/api/community/top-rated")
        .add_query_param("min_rating", 1.0)
        .add_query_param("limit", 1)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    server
        .get("/api/community/top-rated")
        .add_query_param("limit", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_community_ranking_empty_without_reviews() {
    let server = create_test_server();
    let body: Value = server.get("/api/community/top-rated").await.json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_movie_details_include_community_summary() {
    let server = create_test_server();
    let first = register(&server, "neo").await;
    let second = register(&server, "trinity").await;
    post_review(&server, &first, 155, 5).await;
    post_review(&server, &second, 155, 4).await;

    let response = server.get("/api/movies/155").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "The Dark Knight");
    assert_eq!(body["data"]["community"]["mean_rating"], 4.5);
    assert_eq!(body["data"]["community"]["review_count"], 2);

    let body: Value = server.get("/api/movies/603").await.json();
    assert_eq!(body["data"]["community"]["mean_rating"], Value::Null);
    assert_eq!(body["data"]["community"]["review_count"], 0);

    server
        .get("/api/movies/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_top_rated_filters_low_vote_average() {
    let server = create_test_server();

    let body: Value = server.get("/api/movies/top-rated").await.json();
    let catalog = body["data"]["catalog"].as_array().unwrap();

    assert_eq!(catalog.len(), 4);
    assert!(catalog.iter().all(|movie| movie["id"] != 9740));
    assert_eq!(body["data"]["community"], json!([]));
}

#[tokio::test]
async fn test_search_and_home_feed() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/movies/search")
        .add_query_param("q", "matrix")
        .await
        .json();
    assert_eq!(body["data"]["results"][0]["id"], 603);

    server
        .get("/api/movies/search")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let token = register(&server, "neo").await;
    post_review(&server, &token, 550, 5).await;

    let body: Value = server.get("/api/home").await.json();
    assert_eq!(body["data"]["popular"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["most_voted"][0]["id"], 155);
    assert_eq!(body["data"]["community_top"][0]["movie_id"], 550);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}
