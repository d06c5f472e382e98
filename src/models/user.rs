use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Genre;

/// Genre likes and dislikes of a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub favorite_genres: Vec<Genre>,
    #[serde(default)]
    pub disliked_genres: Vec<Genre>,
}

/// A piece of content the user has watched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub content_id: Uuid,
    pub watched_on: DateTime<Utc>,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// A catalog user, only looked up by the list service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[sqlx(json)]
    pub preferences: UserPreferences,
    #[sqlx(json)]
    pub watch_history: Vec<WatchHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user with empty preferences and history
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            preferences: UserPreferences::default(),
            watch_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
