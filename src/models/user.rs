use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered community member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Partial profile edit; absent fields are left unchanged and an empty
/// `bio` or `avatar_url` clears the field
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
            bio: new_user.bio,
            avatar_url: new_user.avatar_url,
            created_at: Utc::now(),
        }
    }

    /// Applies a profile edit; the username is expected to be validated
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(username) = update.username {
            self.username = username.trim().to_string();
        }
        if let Some(bio) = update.bio {
            self.bio = non_empty(bio);
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = non_empty(avatar_url);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Identity of the caller for one authenticated request
///
/// Obtained from `SessionRegistry::load` and handed explicitly to whatever
/// needs the current user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionContext {
    pub token: Uuid,
    pub user: User,
    pub issued_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}
