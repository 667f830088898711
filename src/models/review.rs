use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Identifier of a movie in the external catalog (TMDB numeric id)
pub type MovieId = i64;

/// Title stored when a review is submitted without one
pub const UNKNOWN_MOVIE_TITLE: &str = "Unknown title";

/// A star rating between 1 and 5 inclusive
///
/// The only way to build a `Rating` is through `Rating::new` / `TryFrom`,
/// so every `Review` in the system carries an in-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    #[error("Invalid rating value {0}: ratings must be between 1 and 5")]
    OutOfRange(i64),
}

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// A user's rating and comment for one movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub movie_id: MovieId,
    /// Denormalized at creation time, never re-synced with the catalog
    pub movie_title: String,
    pub movie_poster_path: Option<String>,
    pub rating: Rating,
    pub comment: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the author when submitting a review
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub movie_id: MovieId,
    pub movie_title: String,
    pub movie_poster_path: Option<String>,
    pub rating: Rating,
    pub comment: String,
}

/// Edit flow payload: rating and comment are overwritten in place
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub rating: Rating,
    pub comment: String,
}

impl Review {
    /// Creates a review authored by `author_id`, stamped with the current time
    pub fn new(author_id: Uuid, review: NewReview) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            movie_id: review.movie_id,
            movie_title: review.movie_title,
            movie_poster_path: review.movie_poster_path,
            rating: review.rating,
            comment: review.comment,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: ReviewUpdate) {
        self.rating = update.rating;
        self.comment = update.comment;
        self.updated_at = Utc::now();
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Orders reviews for display: newest first, id as a stable fallback
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_review(rating: i64) -> NewReview {
        NewReview {
            movie_id: 27205,
            movie_title: "Inception".to_string(),
            movie_poster_path: Some("/inception.jpg".to_string()),
            rating: Rating::new(rating).unwrap(),
            comment: "Dreams within dreams".to_string(),
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
        for value in 1..=5 {
            assert_eq!(Rating::new(value).unwrap().value() as i64, value);
        }
    }

    #[test]
    fn test_rating_error_message() {
        let err = Rating::new(7).unwrap_err();
        assert_eq!(err, RatingError::OutOfRange(7));
        assert!(err.to_string().contains("between 1 and 5"));
    }

    #[test]
    fn test_rating_serde_rejects_out_of_range() {
        let rating: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(rating.value(), 4);
        assert_eq!(serde_json::to_string(&rating).unwrap(), "4");

        assert!(serde_json::from_str::<Rating>("9").is_err());
        assert!(serde_json::from_str::<Rating>("0").is_err());
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::new(3).unwrap().to_string(), "3/5");
    }

    #[test]
    fn test_new_review() {
        let author = Uuid::new_v4();
        let review = Review::new(author, new_review(4));
        assert_eq!(review.movie_id, 27205);
        assert_eq!(review.rating.value(), 4);
        assert!(review.is_authored_by(author));
        assert!(!review.is_authored_by(Uuid::new_v4()));
        assert_eq!(review.created_at, review.updated_at);
    }

    #[test]
    fn test_apply_update_overwrites_rating_and_comment() {
        let mut review = Review::new(Uuid::new_v4(), new_review(2));
        let id = review.id;
        review.apply(ReviewUpdate {
            rating: Rating::new(5).unwrap(),
            comment: "Better on a second watch".to_string(),
        });
        assert_eq!(review.id, id);
        assert_eq!(review.rating.value(), 5);
        assert_eq!(review.comment, "Better on a second watch");
        assert_eq!(review.movie_title, "Inception");
        assert!(review.updated_at >= review.created_at);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut older = Review::new(Uuid::new_v4(), new_review(3));
        older.created_at = older.created_at - Duration::days(2);
        let newer = Review::new(Uuid::new_v4(), new_review(5));

        let mut reviews = vec![older.clone(), newer.clone()];
        sort_newest_first(&mut reviews);
        assert_eq!(reviews[0].id, newer.id);
        assert_eq!(reviews[1].id, older.id);
    }
}
