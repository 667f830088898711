use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{Movie, MovieDetails, MovieId, MoviePage, MovieRatingSummary, RankedEntry},
    routes::{ok, ApiResponse, AppState},
    services::{
        catalog::{rank_by_vote_average, CATALOG_TOP_RATED_LIMIT, MIN_CATALOG_VOTE_AVERAGE},
        home::{build_home_feed, HomeFeed},
        AggregateOptions,
    },
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// Catalog and community columns of the top-rated page
#[derive(Debug, Serialize)]
pub struct TopRatedResponse {
    pub catalog: Vec<Movie>,
    pub community: Vec<RankedEntry>,
}

/// Catalog details with the community's verdict attached
#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    #[serde(flatten)]
    pub movie: MovieDetails,
    pub community: MovieRatingSummary,
}

pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<MoviePage>>> {
    let page = state.catalog.popular_movies(query.page).await?;
    Ok(ok(page))
}

/// Catalog movies rated 7.0 or better next to the community top 20
pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<TopRatedResponse>>> {
    let (catalog_page, community) = tokio::try_join!(
        state.catalog.top_rated_movies(query.page),
        state.community.top_rated(AggregateOptions::top_rated_page())
    )?;

    let catalog = rank_by_vote_average(
        catalog_page.results,
        MIN_CATALOG_VOTE_AVERAGE,
        CATALOG_TOP_RATED_LIMIT,
    );

    Ok(ok(TopRatedResponse {
        catalog,
        community: RankedEntry::rank_all(community),
    }))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<MoviePage>>> {
    tracing::debug!(query = %query.q, page = query.page, "Searching catalog");
    let page = state.catalog.search_movies(&query.q, query.page).await?;
    Ok(ok(page))
}

pub async fn details(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<ApiResponse<MovieDetailsResponse>>> {
    let (movie, community) = tokio::try_join!(
        state.catalog.movie_details(movie_id),
        state.community.movie_summary(movie_id)
    )?;

    Ok(ok(MovieDetailsResponse { movie, community }))
}

pub async fn home(State(state): State<AppState>) -> AppResult<Json<ApiResponse<HomeFeed>>> {
    let feed = build_home_feed(state.catalog.as_ref(), &state.community).await?;
    Ok(ok(feed))
}
