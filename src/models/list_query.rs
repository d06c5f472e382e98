use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Fields a list page may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    ContentType,
}

impl SortField {
    /// Name accepted in the `sortBy` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::ContentType => "contentType",
        }
    }

    /// Column in the `my_list` table
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::ContentType => "content_type",
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SortField::CreatedAt,
            SortField::UpdatedAt,
            SortField::ContentType,
        ]
        .into_iter()
        .find(|field| field.as_param() == s)
        .ok_or(AppError::InvalidSortField)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `"asc"` sorts ascending, anything else falls back to descending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw list request as received from the caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListQuery {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Search term, if one was given and is not blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Clamps paging parameters and checks the sort field
    pub fn window(&self) -> Result<ListWindow, AppError> {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1).max(1);
        let skip = match self.skip {
            Some(skip) => skip.max(0),
            None => (page - 1).saturating_mul(limit),
        };
        let sort_by = match self.sort_by.as_deref() {
            Some(field) => field.parse()?,
            None => SortField::default(),
        };

        Ok(ListWindow {
            skip,
            limit,
            sort_by,
            order: SortOrder::from_param(self.sort_order.as_deref()),
        })
    }
}

/// Normalized slice of a list: ordering plus offset and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub skip: i64,
    pub limit: i64,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}
