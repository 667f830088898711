use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{identity_taken_message, user_not_found_message, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{ProfileUpdate, User},
};

/// Process-local account store; accounts are lost on restart
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|existing| {
            existing.username.eq_ignore_ascii_case(&user.username)
                || existing.email.eq_ignore_ascii_case(&user.email)
        });
        if taken {
            return Err(AppError::Conflict(identity_taken_message(&user.username)));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(user_not_found_message(user_id)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let mut users = self.users.write().await;

        if let Some(username) = &update.username {
            let username = username.trim();
            let taken = users
                .values()
                .any(|u| u.id != user_id && u.username.eq_ignore_ascii_case(username));
            if taken {
                return Err(AppError::Conflict(identity_taken_message(username)));
            }
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(user_not_found_message(user_id)))?;
        user.apply(update);

        Ok(user.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
