use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{AggregateRatingEntry, MovieId, MovieRatingSummary, Review};

/// Lowest community mean (out of 5) that makes it into a ranking
pub const DEFAULT_MIN_MEAN_RATING: f64 = 3.0;

/// Parameters for one top-N community ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    /// Inclusive lower bound on the unrounded mean
    pub min_mean_rating: f64,
    /// Inclusive lower bound on the number of reviews
    pub min_review_count: usize,
    /// Maximum number of entries returned
    pub top_n: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self::community()
    }
}

impl AggregateOptions {
    pub fn new(min_mean_rating: f64, top_n: usize) -> Self {
        Self {
            min_mean_rating,
            min_review_count: 1,
            top_n,
        }
    }

    pub fn with_min_review_count(mut self, min_review_count: usize) -> Self {
        self.min_review_count = min_review_count;
        self
    }

    /// Home page strip
    pub fn home() -> Self {
        Self::new(DEFAULT_MIN_MEAN_RATING, 5)
    }

    /// Community list
    pub fn community() -> Self {
        Self::new(DEFAULT_MIN_MEAN_RATING, 10)
    }

    /// Top-rated page, community column
    pub fn top_rated_page() -> Self {
        Self::new(DEFAULT_MIN_MEAN_RATING, 20)
    }
}

/// Running totals for one movie while grouping
struct MovieTally<'a> {
    sum: u64,
    count: usize,
    title: &'a str,
    poster_path: Option<&'a str>,
}

/// Ranks movies by their community mean rating
///
/// ## Algorithm
/// 1. Group reviews by movie, summing ratings. Title and poster come from the
///    last review seen for each movie.
/// 2. Drop movies whose mean is below `min_mean_rating` or that have fewer
///    than `min_review_count` reviews.
/// 3. Sort by mean descending, then review count descending, then movie id
///    ascending.
/// 4. Keep the first `top_n`.
///
/// Pure and deterministic; the input is never modified. Ratings are valid by
/// construction (`Rating` rejects values outside 1..=5), so there is no
/// error path.
pub fn aggregate(reviews: &[Review], options: &AggregateOptions) -> Vec<AggregateRatingEntry> {
    let mut tallies: HashMap<MovieId, MovieTally<'_>> = HashMap::new();

    for review in reviews {
        let tally = tallies.entry(review.movie_id).or_insert(MovieTally {
            sum: 0,
            count: 0,
            title: &review.movie_title,
            poster_path: None,
        });
        tally.sum += u64::from(review.rating.value());
        tally.count += 1;
        tally.title = &review.movie_title;
        tally.poster_path = review.movie_poster_path.as_deref();
    }

    let mut entries: Vec<AggregateRatingEntry> = tallies
        .into_iter()
        .map(|(movie_id, tally)| AggregateRatingEntry {
            movie_id,
            movie_title: tally.title.to_string(),
            movie_poster_path: tally.poster_path.map(str::to_string),
            mean_rating: tally.sum as f64 / tally.count as f64,
            review_count: tally.count,
        })
        .filter(|entry| {
            entry.mean_rating >= options.min_mean_rating
                && entry.review_count >= options.min_review_count
        })
        .collect();

    entries.sort_by(compare_ranked);
    entries.truncate(options.top_n);

    tracing::debug!(
        review_count = reviews.len(),
        ranked = entries.len(),
        top_n = options.top_n,
        min_mean_rating = options.min_mean_rating,
        "Aggregated community ratings"
    );

    entries
}

fn compare_ranked(a: &AggregateRatingEntry, b: &AggregateRatingEntry) -> Ordering {
    b.mean_rating
        .total_cmp(&a.mean_rating)
        .then_with(|| b.review_count.cmp(&a.review_count))
        .then_with(|| a.movie_id.cmp(&b.movie_id))
}

/// Mean rating and count for a single movie, with no threshold applied
///
/// Reviews for other movies in `reviews` are ignored.
pub fn summarize(movie_id: MovieId, reviews: &[Review]) -> MovieRatingSummary {
    let (sum, count) = reviews
        .iter()
        .filter(|review| review.movie_id == movie_id)
        .fold((0u64, 0usize), |(sum, count), review| {
            (sum + u64::from(review.rating.value()), count + 1)
        });

    MovieRatingSummary {
        movie_id,
        mean_rating: (count > 0).then(|| sum as f64 / count as f64),
        review_count: count,
    }
}
