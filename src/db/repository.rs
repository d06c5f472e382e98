//! Storage seams of the list service
//!
//! The service only talks to these traits. `PgStore` implements them on top of
//! PostgreSQL and `MemoryStore` keeps everything in process memory; both give
//! the same uniqueness and ordering guarantees.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ListEntry, ListPage, ListWindow, Movie, NewListEntry, TvShow, User};

/// Errors reported by a store backend
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The write would break the (user, content, kind) uniqueness constraint
    #[error("List entry already exists")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to users. A missing user is `Ok(None)`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Read access to movies and shows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_movie(&self, id: Uuid) -> StoreResult<Option<Movie>>;

    async fn find_tv_show(&self, id: Uuid) -> StoreResult<Option<TvShow>>;

    /// Fetches every movie in `ids` that exists, in no particular order
    async fn find_movies(&self, ids: &[Uuid]) -> StoreResult<Vec<Movie>>;

    /// Fetches every show in `ids` that exists, in no particular order
    async fn find_tv_shows(&self, ids: &[Uuid]) -> StoreResult<Vec<TvShow>>;
}

/// List membership records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Inserts an entry in a single atomic step.
    ///
    /// Returns `StoreError::Duplicate` when the user already has an entry for
    /// the same content and kind.
    async fn insert(&self, entry: NewListEntry) -> StoreResult<ListEntry>;

    /// Deletes the user's entry for `content_id` and returns it, or `None` if
    /// there was nothing to delete
    async fn delete(&self, user_id: Uuid, content_id: Uuid) -> StoreResult<Option<ListEntry>>;

    /// One window of the user's entries, without content
    async fn find_page(&self, user_id: Uuid, window: ListWindow) -> StoreResult<Vec<ListEntry>>;

    /// Number of entries in the user's list
    async fn count(&self, user_id: Uuid) -> StoreResult<u64>;

    /// Entries whose content title contains `term`, ignoring case, joined with
    /// their content. `total_count` counts every match, not just the window.
    async fn search_page(
        &self,
        user_id: Uuid,
        term: &str,
        window: ListWindow,
    ) -> StoreResult<ListPage>;
}
