pub mod community;
pub mod favorite;
pub mod movie;
pub mod review;
pub mod user;

pub use community::{round_one_decimal, AggregateRatingEntry, MovieRatingSummary, RankedEntry};
pub use favorite::{sort_recently_added_first, Favorite, NewFavorite};
pub use movie::{CastMember, Genre, Movie, MovieDetails, MoviePage, TmdbMovieDetails};
pub use review::{
    sort_newest_first, MovieId, NewReview, Rating, RatingError, Review, ReviewUpdate,
    UNKNOWN_MOVIE_TITLE,
};
pub use user::{NewUser, ProfileUpdate, SessionContext, User};
