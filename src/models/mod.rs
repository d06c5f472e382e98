mod content;
mod list_entry;
mod list_query;
mod user;

pub use content::{Content, ContentKind, Episode, Genre, Movie, ParseContentKindError, TvShow};
pub use list_entry::{ListEntry, ListItem, ListPage, NewListEntry};
pub use list_query::{
    ListQuery, ListWindow, SortField, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use user::{User, UserPreferences, WatchHistoryEntry};

#[cfg(test)]
pub(crate) use content::fixtures;
