use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

/// Kind of content a list entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    #[serde(rename = "tvshow")]
    TvShow,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Movie, ContentKind::TvShow];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::TvShow => "tvshow",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown content type: {0:?}")]
pub struct ParseContentKindError(pub String);

impl FromStr for ContentKind {
    type Err = ParseContentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseContentKindError(s.to_string()))
    }
}

impl TryFrom<String> for ContentKind {
    type Error = ParseContentKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Genre tag shared by movies, shows and user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Romance,
    SciFi,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sqlx(json)]
    pub genres: Vec<Genre>,
    pub release_date: DateTime<Utc>,
    pub director: String,
    pub actors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub episode_number: u32,
    pub season_number: u32,
    pub release_date: DateTime<Utc>,
    pub director: String,
    #[serde(default)]
    pub actors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TvShow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sqlx(json)]
    pub genres: Vec<Genre>,
    #[sqlx(json)]
    pub episodes: Vec<Episode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A resolved content document, either a movie or a show
///
/// Serializes as the bare inner document so it can be embedded under a
/// list item's `content` key.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Content {
    Movie(Movie),
    TvShow(TvShow),
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Movie(_) => ContentKind::Movie,
            Content::TvShow(_) => ContentKind::TvShow,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Content::Movie(movie) => movie.id,
            Content::TvShow(show) => show.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Content::Movie(movie) => &movie.title,
            Content::TvShow(show) => &show.title,
        }
    }

    /// Decodes a JSON document of the given kind
    pub fn from_value(kind: ContentKind, value: serde_json::Value) -> serde_json::Result<Self> {
        match kind {
            ContentKind::Movie => serde_json::from_value(value).map(Content::Movie),
            ContentKind::TvShow => serde_json::from_value(value).map(Content::TvShow),
        }
    }
}

impl From<Movie> for Content {
    fn from(movie: Movie) -> Self {
        Content::Movie(movie)
    }
}

impl From<TvShow> for Content {
    fn from(show: TvShow) -> Self {
        Content::TvShow(show)
    }
}
