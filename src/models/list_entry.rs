use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Content, ContentKind};

/// Membership of one content item in one user's list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub content_id: Uuid,
    #[sqlx(try_from = "String")]
    pub content_type: ContentKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when inserting an entry; the store assigns
/// the id and timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewListEntry {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub content_type: ContentKind,
}

/// A list entry with its content document resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListItem {
    #[serde(flatten)]
    pub entry: ListEntry,
    /// `None` when the referenced document has been deleted
    pub content: Option<Content>,
}

/// One page of a user's list
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub results: Vec<ListItem>,
    pub total_count: u64,
}

impl ListPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    fn entry() -> ListEntry {
        let now = Utc::now();
        ListEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content_id: Uuid::new_v4(),
            content_type: ContentKind::TvShow,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = entry();
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["user"], entry.user_id.to_string());
        assert_eq!(json["contentId"], entry.content_id.to_string());
        assert_eq!(json["contentType"], "tvshow");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_item_embeds_content_next_to_entry_fields() {
        let show = fixtures::tv_show("Breaking Bad");
        let item = ListItem {
            entry: entry(),
            content: Some(Content::TvShow(show)),
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["contentType"], "tvshow");
        assert_eq!(json["content"]["title"], "Breaking Bad");
        assert_eq!(json["content"]["episodes"][0]["seasonNumber"], 1);
    }

    #[test]
    fn test_item_with_missing_content() {
        let item = ListItem {
            entry: entry(),
            content: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json["content"].is_null());
    }

    #[test]
    fn test_empty_page() {
        let json = serde_json::to_value(ListPage::empty()).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 0);
        assert_eq!(json["totalCount"], 0);
    }
}
