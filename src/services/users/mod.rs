//! User account storage
//!
//! Accounts live wherever reviews live, so a review's `author_id` always
//! names a user who can sign in again. Sessions stay in the registry.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ProfileUpdate, User},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Trait for user account backends
///
/// Usernames and emails are unique, compared case-insensitively.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a new account, `AppError::Conflict` if the username or email is taken
    async fn create_user(&self, user: User) -> AppResult<User>;

    async fn get_user(&self, user_id: Uuid) -> AppResult<User>;

    /// Case-insensitive lookup used to sign back in
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Applies a profile edit, `AppError::Conflict` if the new username is taken
    async fn update_user(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

pub(crate) fn user_not_found_message(user_id: Uuid) -> String {
    format!("User {} not found", user_id)
}

pub(crate) fn identity_taken_message(username: &str) -> String {
    format!("Username or email already registered: {}", username)
}
