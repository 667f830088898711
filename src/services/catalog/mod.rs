//! Movie catalog abstraction
//!
//! The catalog (titles, posters, release data, popularity) is owned by an
//! external metadata provider. Routes talk to it only through
//! `CatalogProvider`, so the provider can be swapped or mocked.

use crate::{
    error::AppResult,
    models::{Movie, MovieDetails, MovieId, MoviePage},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Catalog movies below this vote average are left off the top-rated page
pub const MIN_CATALOG_VOTE_AVERAGE: f64 = 7.0;
/// Length of the catalog column on the top-rated page
pub const CATALOG_TOP_RATED_LIMIT: usize = 20;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Currently popular movies, one page at a time (pages start at 1)
    async fn popular_movies(&self, page: u32) -> AppResult<MoviePage>;

    /// The provider's own top-rated list
    async fn top_rated_movies(&self, page: u32) -> AppResult<MoviePage>;

    /// Search movies by title
    ///
    /// An empty or whitespace-only query is rejected with `InvalidInput`.
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage>;

    /// Full details, genres and leading cast for one movie
    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Keeps movies with at least `min_vote_average`, best first, at most `top_n`
pub fn rank_by_vote_average(movies: Vec<Movie>, min_vote_average: f64, top_n: usize) -> Vec<Movie> {
    let mut ranked: Vec<Movie> = movies
        .into_iter()
        .filter(|movie| movie.vote_average >= min_vote_average)
        .collect();
    ranked.sort_by(|a, b| {
        b.vote_average
            .total_cmp(&a.vote_average)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(top_n);
    ranked
}

/// Most-voted movies first, at most `top_n`
pub fn rank_by_vote_count(movies: Vec<Movie>, top_n: usize) -> Vec<Movie> {
    let mut ranked = movies;
    ranked.sort_by(|a, b| b.vote_count.cmp(&a.vote_count).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
pub(crate) fn test_movie(id: MovieId, vote_average: f64, vote_count: u64) -> Movie {
    Movie {
        id,
        title: format!("Movie {}", id),
        poster_path: Some(format!("/{}.jpg", id)),
        backdrop_path: None,
        overview: String::new(),
        release_date: "2020-01-01".to_string(),
        vote_average,
        vote_count,
        genre_ids: vec![],
    }
}
