use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::models::{
    Content, ListEntry, ListItem, ListPage, ListWindow, Movie, NewListEntry, TvShow, User,
};

use super::repository::{
    ContentRepository, ListRepository, StoreError, StoreResult, UserRepository,
};

const ENTRY_COLUMNS: &str = "id, user_id, content_id, content_type, created_at, updated_at";

const MOVIE_COLUMNS: &str =
    "id, title, description, genres, release_date, director, actors, created_at, updated_at";

const TV_SHOW_COLUMNS: &str = "id, title, description, genres, episodes, created_at, updated_at";

/// Entries of one user joined with whichever content table their kind points
/// at. Content is rendered with the same camelCase keys the API uses so it can
/// be decoded straight into `Content`.
const JOINED_ENTRIES: &str = r#"
    SELECT
        e.id, e.user_id, e.content_id, e.content_type, e.created_at, e.updated_at,
        CASE WHEN e.content_type = 'movie' THEN m.title ELSE t.title END AS title,
        CASE WHEN e.content_type = 'movie' THEN
            CASE WHEN m.id IS NULL THEN NULL ELSE jsonb_build_object(
                'id', m.id,
                'title', m.title,
                'description', m.description,
                'genres', m.genres,
                'releaseDate', m.release_date,
                'director', m.director,
                'actors', to_jsonb(m.actors),
                'createdAt', m.created_at,
                'updatedAt', m.updated_at
            ) END
        ELSE
            CASE WHEN t.id IS NULL THEN NULL ELSE jsonb_build_object(
                'id', t.id,
                'title', t.title,
                'description', t.description,
                'genres', t.genres,
                'episodes', t.episodes,
                'createdAt', t.created_at,
                'updatedAt', t.updated_at
            ) END
        END AS content
    FROM my_list e
    LEFT JOIN movies m ON m.id = e.content_id
    LEFT JOIN tv_shows t ON t.id = e.content_id
    WHERE e.user_id = $1
"#;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the migrations bundled with the crate
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JoinedRow {
    #[sqlx(flatten)]
    entry: ListEntry,
    content: Option<serde_json::Value>,
}

impl TryFrom<JoinedRow> for ListItem {
    type Error = StoreError;

    fn try_from(row: JoinedRow) -> Result<Self, Self::Error> {
        let content = row
            .content
            .map(|value| Content::from_value(row.entry.content_type, value))
            .transpose()
            .map_err(|e| StoreError::Corrupt(format!("content of entry {}: {}", row.entry.id, e)))?;

        Ok(ListItem {
            entry: row.entry,
            content,
        })
    }
}

/// Turns a search term into an ILIKE pattern that matches it literally as a
/// substring
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `ORDER BY` clause for a window. Column and direction come from closed
/// enums, never from caller input.
fn order_clause(window: &ListWindow) -> String {
    let dir = window.order.sql();
    format!("ORDER BY {} {dir}, id {dir}", window.sort_by.column())
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate;
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, preferences, watch_history, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ContentRepository for PgStore {
    async fn find_movie(&self, id: Uuid) -> StoreResult<Option<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(movie)
    }

    async fn find_tv_show(&self, id: Uuid) -> StoreResult<Option<TvShow>> {
        let sql = format!("SELECT {TV_SHOW_COLUMNS} FROM tv_shows WHERE id = $1");
        let show = sqlx::query_as::<_, TvShow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(show)
    }

    async fn find_movies(&self, ids: &[Uuid]) -> StoreResult<Vec<Movie>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ANY($1)");
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(movies)
    }

    async fn find_tv_shows(&self, ids: &[Uuid]) -> StoreResult<Vec<TvShow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {TV_SHOW_COLUMNS} FROM tv_shows WHERE id = ANY($1)");
        let shows = sqlx::query_as::<_, TvShow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(shows)
    }
}

#[async_trait]
impl ListRepository for PgStore {
    async fn insert(&self, entry: NewListEntry) -> StoreResult<ListEntry> {
        let sql = format!(
            "INSERT INTO my_list (id, user_id, content_id, content_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {ENTRY_COLUMNS}"
        );

        sqlx::query_as::<_, ListEntry>(&sql)
            .bind(Uuid::new_v4())
            .bind(entry.user_id)
            .bind(entry.content_id)
            .bind(entry.content_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn delete(&self, user_id: Uuid, content_id: Uuid) -> StoreResult<Option<ListEntry>> {
        let sql = format!(
            "DELETE FROM my_list
             WHERE id = (
                 SELECT id FROM my_list
                 WHERE user_id = $1 AND content_id = $2
                 LIMIT 1
             )
             RETURNING {ENTRY_COLUMNS}"
        );

        let deleted = sqlx::query_as::<_, ListEntry>(&sql)
            .bind(user_id)
            .bind(content_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }

    async fn find_page(&self, user_id: Uuid, window: ListWindow) -> StoreResult<Vec<ListEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM my_list
             WHERE user_id = $1
             {}
             OFFSET $2 LIMIT $3",
            order_clause(&window)
        );

        let entries = sqlx::query_as::<_, ListEntry>(&sql)
            .bind(user_id)
            .bind(window.skip)
            .bind(window.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn count(&self, user_id: Uuid) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM my_list WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn search_page(
        &self,
        user_id: Uuid,
        term: &str,
        window: ListWindow,
    ) -> StoreResult<ListPage> {
        let pattern = like_pattern(term);

        let page_sql = format!(
            "SELECT id, user_id, content_id, content_type, created_at, updated_at, content
             FROM ({JOINED_ENTRIES}) joined
             WHERE title ILIKE $2
             {}
             OFFSET $3 LIMIT $4",
            order_clause(&window)
        );
        let rows = sqlx::query_as::<_, JoinedRow>(&page_sql)
            .bind(user_id)
            .bind(&pattern)
            .bind(window.skip)
            .bind(window.limit)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM ({JOINED_ENTRIES}) joined WHERE title ILIKE $2"
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(user_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let results = rows
            .into_iter()
            .map(ListItem::try_from)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(ListPage {
            results,
            total_count: total.max(0) as u64,
        })
    }
}
