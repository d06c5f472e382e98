use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    db::{ContentRepository, ListRepository, StoreError, UserRepository},
    error::{AppError, AppResult},
    models::{Content, ContentKind, ListEntry, ListItem, ListPage, ListQuery, NewListEntry, User},
};

/// Request to add one item to a user's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToList {
    pub user_id: Uuid,
    pub content_id: Uuid,
    /// Raw kind as sent by the client, checked by the service
    pub content_type: String,
}

/// Request to remove one item from a user's list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveFromList {
    pub user_id: Uuid,
    pub content_id: Uuid,
}

/// Adds, removes and lists the items of a user's watchlist
///
/// Holds no state of its own beyond the repository handles it is built with.
#[derive(Clone)]
pub struct MyListService {
    users: Arc<dyn UserRepository>,
    content: Arc<dyn ContentRepository>,
    list: Arc<dyn ListRepository>,
}

impl MyListService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        content: Arc<dyn ContentRepository>,
        list: Arc<dyn ListRepository>,
    ) -> Self {
        Self {
            users,
            content,
            list,
        }
    }

    /// Adds an item to the user's list.
    ///
    /// Checks run in order and stop at the first failure: user exists,
    /// content type is known, content exists, entry is not a duplicate.
    pub async fn add_to_list(&self, request: AddToList) -> AppResult<ListEntry> {
        let AddToList {
            user_id,
            content_id,
            content_type,
        } = request;

        tracing::info!(%user_id, %content_id, %content_type, "Adding item to list");

        self.require_user(user_id, || AppError::SaveFailed).await?;

        let kind: ContentKind = content_type.parse().map_err(|_| {
            tracing::warn!(%content_type, "Invalid content type");
            AppError::InvalidContentType
        })?;

        self.require_content(kind, content_id).await?;

        let new_entry = NewListEntry {
            user_id,
            content_id,
            content_type: kind,
        };

        let saved = self.list.insert(new_entry).await.map_err(|e| match e {
            StoreError::Duplicate => {
                tracing::warn!(%user_id, %content_id, "Item already in list");
                AppError::ItemAlreadyExists
            }
            other => {
                tracing::error!(%user_id, %content_id, error = %other, "Saving list entry failed");
                AppError::SaveFailed
            }
        })?;

        tracing::info!(
            %user_id,
            %content_id,
            content_type = %kind,
            entry_id = %saved.id,
            "Item added to list"
        );

        Ok(saved)
    }

    /// Removes an item from the user's list and returns the deleted entry
    pub async fn remove_from_list(&self, request: RemoveFromList) -> AppResult<ListEntry> {
        let RemoveFromList {
            user_id,
            content_id,
        } = request;

        tracing::debug!(%user_id, %content_id, "Removing item from list");

        self.require_user(user_id, || AppError::RemoveFailed).await?;

        let deleted = self
            .list
            .delete(user_id, content_id)
            .await
            .map_err(|e| {
                tracing::error!(%user_id, %content_id, error = %e, "Deleting list entry failed");
                AppError::RemoveFailed
            })?;

        match deleted {
            Some(entry) => {
                tracing::info!(%user_id, %content_id, "Item removed from list");
                Ok(entry)
            }
            None => {
                tracing::warn!(%user_id, %content_id, "Item not found in list");
                Err(AppError::ItemNotFound)
            }
        }
    }

    /// Returns one page of the user's list with content embedded.
    ///
    /// Without a search term the page is read directly and content is
    /// resolved afterwards. With one, the store joins content first and
    /// filters on title, and the total counts only matching entries.
    pub async fn get_list(&self, query: ListQuery) -> AppResult<ListPage> {
        let window = query.window()?;
        let user_id = query.user_id;

        tracing::debug!(
            %user_id,
            search = ?query.search_term(),
            skip = window.skip,
            limit = window.limit,
            sort_by = window.sort_by.as_param(),
            "Fetching list"
        );

        let page = match query.search_term() {
            None => {
                let entries = self.list.find_page(user_id, window).await;
                let total = self.list.count(user_id).await;
                match (entries, total) {
                    (Ok(entries), Ok(total_count)) => {
                        let results = self.attach_content(entries).await;
                        results.map(|results| ListPage {
                            results,
                            total_count,
                        })
                    }
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }
            }
            Some(term) => self.list.search_page(user_id, term, window).await,
        };

        page.map_err(|e| {
            tracing::error!(%user_id, error = %e, "Fetching list failed");
            AppError::GetListFailed
        })
    }

    /// Resolves each entry's content with one batched lookup per kind
    async fn attach_content(&self, entries: Vec<ListEntry>) -> Result<Vec<ListItem>, StoreError> {
        let ids_of = |kind: ContentKind| -> Vec<Uuid> {
            entries
                .iter()
                .filter(|e| e.content_type == kind)
                .map(|e| e.content_id)
                .collect()
        };

        let movie_ids = ids_of(ContentKind::Movie);
        let show_ids = ids_of(ContentKind::TvShow);

        let movies = self.content.find_movies(&movie_ids).await?;
        let shows = self.content.find_tv_shows(&show_ids).await?;

        let found: HashMap<(ContentKind, Uuid), Content> = movies
            .into_iter()
            .map(Content::from)
            .chain(shows.into_iter().map(Content::from))
            .map(|content| ((content.kind(), content.id()), content))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let content = found.get(&(entry.content_type, entry.content_id)).cloned();
                if content.is_none() {
                    tracing::warn!(entry_id = %entry.id, content_id = %entry.content_id, "List entry points at missing content");
                }
                ListItem { entry, content }
            })
            .collect())
    }

    /// Looks up a user, failing with `UserNotFound` when absent.
    ///
    /// `on_store_error` picks the domain error a failed lookup becomes.
    async fn require_user<F>(&self, user_id: Uuid, on_store_error: F) -> AppResult<User>
    where
        F: FnOnce() -> AppError,
    {
        match self.users.find_user(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::warn!(%user_id, "User not found");
                Err(AppError::UserNotFound)
            }
            Err(e) => {
                tracing::error!(%user_id, error = %e, "User lookup failed");
                Err(on_store_error())
            }
        }
    }

    async fn require_content(&self, kind: ContentKind, content_id: Uuid) -> AppResult<Content> {
        let found = match kind {
            ContentKind::Movie => self
                .content
                .find_movie(content_id)
                .await
                .map(|m| m.map(Content::from)),
            ContentKind::TvShow => self
                .content
                .find_tv_show(content_id)
                .await
                .map(|s| s.map(Content::from)),
        };

        match found {
            Ok(Some(content)) => Ok(content),
            Ok(None) => {
                tracing::warn!(%content_id, content_type = %kind, "Content not found");
                Err(AppError::ContentNotFound)
            }
            Err(e) => {
                tracing::error!(%content_id, content_type = %kind, error = %e, "Content lookup failed");
                Err(AppError::SaveFailed)
            }
        }
    }
}
