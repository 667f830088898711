use serde::{Serialize, Serializer};

use super::MovieId;

/// Rounds a mean rating to one decimal digit for display
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn serialize_one_decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_one_decimal(*value))
}

fn serialize_optional_one_decimal<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&round_one_decimal(*v)),
        None => serializer.serialize_none(),
    }
}

/// Per-movie community rating derived from reviews
///
/// Computed fresh on every aggregation, never persisted. `mean_rating` keeps
/// full precision; only its serialized form is rounded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateRatingEntry {
    pub movie_id: MovieId,
    pub movie_title: String,
    pub movie_poster_path: Option<String>,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub mean_rating: f64,
    pub review_count: usize,
}

impl AggregateRatingEntry {
    pub fn display_rating(&self) -> f64 {
        round_one_decimal(self.mean_rating)
    }
}

/// An aggregate entry with its 1-based position in a top-N list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: AggregateRatingEntry,
}

impl RankedEntry {
    pub fn rank_all(entries: Vec<AggregateRatingEntry>) -> Vec<RankedEntry> {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| RankedEntry {
                rank: index + 1,
                entry,
            })
            .collect()
    }
}

/// Community rating for a single movie, shown on its detail page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieRatingSummary {
    pub movie_id: MovieId,
    /// `None` when nobody has reviewed the movie yet
    #[serde(serialize_with = "serialize_optional_one_decimal")]
    pub mean_rating: Option<f64>,
    pub review_count: usize,
}
