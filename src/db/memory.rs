use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Content, ContentKind, ListEntry, ListItem, ListPage, ListWindow, Movie, NewListEntry,
    SortField, SortOrder, TvShow, User,
};

use super::repository::{
    ContentRepository, ListRepository, StoreError, StoreResult, UserRepository,
};

/// Process-local store with the same semantics as `PgStore`
///
/// Cloning is cheap and every clone shares the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: HashMap<Uuid, User>,
    movies: HashMap<Uuid, Movie>,
    tv_shows: HashMap<Uuid, TvShow>,
    entries: Vec<ListEntry>,
}

impl MemoryStoreInner {
    fn resolve(&self, kind: ContentKind, id: Uuid) -> Option<Content> {
        match kind {
            ContentKind::Movie => self.movies.get(&id).cloned().map(Content::from),
            ContentKind::TvShow => self.tv_shows.get(&id).cloned().map(Content::from),
        }
    }

    fn entries_of(&self, user_id: Uuid) -> impl Iterator<Item = &ListEntry> {
        self.entries.iter().filter(move |e| e.user_id == user_id)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn add_movie(&self, movie: Movie) {
        self.inner.write().await.movies.insert(movie.id, movie);
    }

    pub async fn add_tv_show(&self, show: TvShow) {
        self.inner.write().await.tv_shows.insert(show.id, show);
    }

    pub async fn remove_movie(&self, id: Uuid) -> Option<Movie> {
        self.inner.write().await.movies.remove(&id)
    }
}

fn compare(a: &ListEntry, b: &ListEntry, window: &ListWindow) -> Ordering {
    let by_field = match window.sort_by {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::ContentType => a.content_type.as_str().cmp(b.content_type.as_str()),
    };
    let ordering = by_field.then_with(|| a.id.cmp(&b.id));

    match window.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Sorts and slices entries the way `ORDER BY .. OFFSET .. LIMIT` would
fn apply_window<T, F>(mut items: Vec<T>, window: &ListWindow, entry_of: F) -> Vec<T>
where
    F: Fn(&T) -> &ListEntry,
{
    items.sort_by(|a, b| compare(entry_of(a), entry_of(b), window));
    items
        .into_iter()
        .skip(window.skip.max(0) as usize)
        .take(window.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn find_movie(&self, id: Uuid) -> StoreResult<Option<Movie>> {
        Ok(self.inner.read().await.movies.get(&id).cloned())
    }

    async fn find_tv_show(&self, id: Uuid) -> StoreResult<Option<TvShow>> {
        Ok(self.inner.read().await.tv_shows.get(&id).cloned())
    }

    async fn find_movies(&self, ids: &[Uuid]) -> StoreResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.movies.get(id).cloned())
            .collect())
    }

    async fn find_tv_shows(&self, ids: &[Uuid]) -> StoreResult<Vec<TvShow>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.tv_shows.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn insert(&self, entry: NewListEntry) -> StoreResult<ListEntry> {
        // Check and insert under one write lock
        let mut inner = self.inner.write().await;

        let exists = inner.entries.iter().any(|e| {
            e.user_id == entry.user_id
                && e.content_id == entry.content_id
                && e.content_type == entry.content_type
        });
        if exists {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let saved = ListEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            content_id: entry.content_id,
            content_type: entry.content_type,
            created_at: now,
            updated_at: now,
        };
        inner.entries.push(saved.clone());

        Ok(saved)
    }

    async fn delete(&self, user_id: Uuid, content_id: Uuid) -> StoreResult<Option<ListEntry>> {
        let mut inner = self.inner.write().await;
        let position = inner
            .entries
            .iter()
            .position(|e| e.user_id == user_id && e.content_id == content_id);

        Ok(position.map(|index| inner.entries.remove(index)))
    }

    async fn find_page(&self, user_id: Uuid, window: ListWindow) -> StoreResult<Vec<ListEntry>> {
        let inner = self.inner.read().await;
        let entries: Vec<ListEntry> = inner.entries_of(user_id).cloned().collect();
        Ok(apply_window(entries, &window, |e| e))
    }

    async fn count(&self, user_id: Uuid) -> StoreResult<u64> {
        Ok(self.inner.read().await.entries_of(user_id).count() as u64)
    }

    async fn search_page(
        &self,
        user_id: Uuid,
        term: &str,
        window: ListWindow,
    ) -> StoreResult<ListPage> {
        let needle = term.to_lowercase();
        let inner = self.inner.read().await;

        let matches: Vec<ListItem> = inner
            .entries_of(user_id)
            .filter_map(|entry| {
                let content = inner.resolve(entry.content_type, entry.content_id)?;
                content
                    .title()
                    .to_lowercase()
                    .contains(&needle)
                    .then(|| ListItem {
                        entry: entry.clone(),
                        content: Some(content),
                    })
            })
            .collect();

        let total_count = matches.len() as u64;
        Ok(ListPage {
            results: apply_window(matches, &window, |item| &item.entry),
            total_count,
        })
    }
}
