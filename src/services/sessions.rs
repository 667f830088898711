use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{NewUser, ProfileUpdate, SessionContext, User},
    services::users::{InMemoryUserStore, UserStore},
};

/// Issued session, resolved against the current user record on load
#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: Uuid,
    issued_at: DateTime<Utc>,
}

/// Users and their open sessions
///
/// Handlers never read identity from ambient state: they `load` a
/// `SessionContext` for the request's token and pass it along. Accounts are
/// kept in a `UserStore`; tokens are process-local, so after a restart users
/// sign in again with `login`. Credentials are verified upstream.
pub struct SessionRegistry {
    users: Arc<dyn UserStore>,
    sessions: RwLock<HashMap<Uuid, SessionRecord>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryUserStore::new()))
    }
}

fn validate_username(username: &str) -> AppResult<()> {
    let length = username.chars().count();
    if !(3..=32).contains(&length) {
        return Err(AppError::InvalidInput(
            "Username must be between 3 and 32 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::InvalidInput(format!(
            "Invalid email address: {}",
            email
        ))),
    }
}

impl SessionRegistry {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a user and opens their first session
    pub async fn register(&self, new_user: NewUser) -> AppResult<SessionContext> {
        let user = User::new(new_user);
        validate_username(&user.username)?;
        validate_email(&user.email)?;

        let user = self.users.create_user(user).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            store = self.users.name(),
            "User registered"
        );

        self.open(user.id).await
    }

    /// Opens a new session for the account registered under `email`
    pub async fn login(&self, email: &str) -> AppResult<SessionContext> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            AppError::Unauthorized(format!("No account registered for {}", email.trim()))
        })?;

        tracing::info!(user_id = %user.id, "User signed in");

        self.open(user.id).await
    }

    /// Opens a new session for an existing user
    pub async fn open(&self, user_id: Uuid) -> AppResult<SessionContext> {
        let user = self.users.get_user(user_id).await?;
        let token = Uuid::new_v4();
        let record = SessionRecord {
            user_id,
            issued_at: Utc::now(),
        };

        self.sessions.write().await.insert(token, record.clone());
        tracing::debug!(user_id = %user_id, "Session opened");

        Ok(SessionContext {
            token,
            user,
            issued_at: record.issued_at,
        })
    }

    /// Resolves a bearer token to the caller's session
    pub async fn load(&self, token: Uuid) -> AppResult<SessionContext> {
        let record = self
            .sessions
            .read()
            .await
            .get(&token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Session expired or unknown".to_string()))?;

        let user = match self.users.get_user(record.user_id).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Unauthorized(
                    "Session refers to a removed user".to_string(),
                ))
            }
            Err(e) => return Err(e),
        };

        Ok(SessionContext {
            token,
            user,
            issued_at: record.issued_at,
        })
    }

    /// Ends a session; returns whether it existed
    pub async fn clear(&self, token: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&token);
        if let Some(record) = &removed {
            tracing::debug!(user_id = %record.user_id, "Session cleared");
        }
        removed.is_some()
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users.get_user(user_id).await
    }

    /// Applies a partial profile edit
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        if let Some(username) = &update.username {
            validate_username(username.trim())?;
        }
        self.users.update_user(user_id, update).await
    }
}
