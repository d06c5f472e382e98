//! Request payloads as they arrive over HTTP, and their checks.
//!
//! Every field is optional at the serde level so missing values are reported
//! in the response envelope instead of as a bare extractor rejection. All
//! problems of one request are collected and reported together.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::ListQuery,
    services::{AddToList, RemoveFromList},
};

const USER_ID: &str = "User ID";
const CONTENT_ID: &str = "Content ID";
const CONTENT_TYPE: &str = "Content type";

#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn present<'a>(&mut self, value: &'a Option<String>, label: &str) -> Option<&'a str> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.0.push(format!("{label} is required"));
                None
            }
        }
    }

    fn id(&mut self, value: &Option<String>, label: &str) -> Option<Uuid> {
        let raw = self.present(value, label)?;
        match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                self.0.push(format!("{label} must be a valid id"));
                None
            }
        }
    }

    /// Optional integer, blank counts as absent
    fn number(&mut self, value: &Option<String>, name: &str) -> Option<i64> {
        let raw = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        match raw.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.0.push(format!("{name} must be a number"));
                None
            }
        }
    }

    fn into_error(self) -> AppError {
        tracing::warn!(violations = ?self.0, "Validation failed");
        AppError::Validation(self.0.join("; "))
    }
}

/// Body of `POST /mylist/addToMyList`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToListBody {
    pub user: Option<String>,
    pub content_id: Option<String>,
    pub content_type: Option<String>,
}

impl AddToListBody {
    /// Checks presence and id format. The content type value itself is
    /// checked by the service.
    pub fn validate(self) -> AppResult<AddToList> {
        let mut violations = Violations::default();
        let user_id = violations.id(&self.user, USER_ID);
        let content_id = violations.id(&self.content_id, CONTENT_ID);
        let content_type = violations
            .present(&self.content_type, CONTENT_TYPE)
            .map(str::to_string);

        match (user_id, content_id, content_type) {
            (Some(user_id), Some(content_id), Some(content_type)) => Ok(AddToList {
                user_id,
                content_id,
                content_type,
            }),
            _ => Err(violations.into_error()),
        }
    }
}

/// Body of `DELETE /mylist`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromListBody {
    pub user: Option<String>,
    pub content_id: Option<String>,
}

impl RemoveFromListBody {
    pub fn validate(self) -> AppResult<RemoveFromList> {
        let mut violations = Violations::default();
        let user_id = violations.id(&self.user, USER_ID);
        let content_id = violations.id(&self.content_id, CONTENT_ID);

        match (user_id, content_id) {
            (Some(user_id), Some(content_id)) => Ok(RemoveFromList {
                user_id,
                content_id,
            }),
            _ => Err(violations.into_error()),
        }
    }
}

/// Query string of `GET /mylist`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub user: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    pub fn validate(self) -> AppResult<ListQuery> {
        let mut violations = Violations::default();
        let user_id = violations.id(&self.user, USER_ID);
        let page = violations.number(&self.page, "page");
        let limit = violations.number(&self.limit, "limit");
        let skip = violations.number(&self.skip, "skip");

        match user_id {
            Some(user_id) if violations.0.is_empty() => Ok(ListQuery {
                user_id,
                search: self.search,
                page,
                limit,
                skip,
                sort_by: self.sort_by.filter(|s| !s.trim().is_empty()),
                sort_order: self.sort_order,
            }),
            _ => Err(violations.into_error()),
        }
    }
}
