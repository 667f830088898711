use serde::{Deserialize, Serialize};

use super::MovieId;

/// Number of cast members kept on a movie's detail view
pub const MAX_CAST_MEMBERS: usize = 10;

/// A catalog movie as listed by the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// One page of catalog results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Full catalog record for a movie's detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub cast: Vec<CastMember>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from TMDB `GET /movie/{id}?append_to_response=credits`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(details: TmdbMovieDetails) -> Self {
        let cast = details
            .credits
            .map(|credits| {
                credits
                    .cast
                    .into_iter()
                    .take(MAX_CAST_MEMBERS)
                    .collect()
            })
            .unwrap_or_default();

        MovieDetails {
            id: details.id,
            title: details.title,
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
            overview: details.overview.unwrap_or_default(),
            release_date: details.release_date.unwrap_or_default(),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            genres: details.genres,
            runtime: details.runtime,
            cast,
        }
    }
}
