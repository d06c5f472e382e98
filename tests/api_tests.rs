use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use my_list_api::{
    api::{create_router, AppState},
    db::MemoryStore,
    models::{Episode, Genre, Movie, TvShow, User},
};

const ADD: &str = "/api/v1/mylist/addToMyList";
const LIST: &str = "/api/v1/mylist";

struct Fixture {
    server: TestServer,
    store: MemoryStore,
    user: Uuid,
}

fn movie(title: &str) -> Movie {
    let now = Utc::now();
    Movie {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "A thief who steals corporate secrets".to_string(),
        genres: vec![Genre::SciFi],
        release_date: now,
        director: "Christopher Nolan".to_string(),
        actors: vec!["Leonardo DiCaprio".to_string()],
        created_at: now,
        updated_at: now,
    }
}

fn tv_show(title: &str) -> TvShow {
    let now = Utc::now();
    TvShow {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "A chemistry teacher turns to crime".to_string(),
        genres: vec![Genre::Drama],
        episodes: vec![Episode {
            episode_number: 1,
            season_number: 1,
            release_date: now,
            director: "Vince Gilligan".to_string(),
            actors: vec!["Bryan Cranston".to_string()],
        }],
        created_at: now,
        updated_at: now,
    }
}

async fn create_fixture() -> Fixture {
    let store = MemoryStore::new();
    let user = User::new("alice");
    let user_id = user.id;
    store.add_user(user).await;

    let app = create_router(AppState::from_store(store.clone()));
    Fixture {
        server: TestServer::new(app).unwrap(),
        store,
        user: user_id,
    }
}

impl Fixture {
    async fn add_movie(&self, title: &str) -> Uuid {
        let movie = movie(title);
        let id = movie.id;
        self.store.add_movie(movie).await;
        id
    }

    async fn add_tv_show(&self, title: &str) -> Uuid {
        let show = tv_show(title);
        let id = show.id;
        self.store.add_tv_show(show).await;
        id
    }

    async fn add_to_list(&self, content_id: Uuid, content_type: &str) -> axum_test::TestResponse {
        self.server
            .post(ADD)
            .json(&json!({
                "user": self.user,
                "contentId": content_id,
                "contentType": content_type
            }))
            .await
    }

    async fn list(&self, params: &[(&str, &str)]) -> axum_test::TestResponse {
        let mut request = self.server.get(LIST).add_query_param("user", self.user);
        for (key, value) in params {
            request = request.add_query_param(key, value);
        }
        request.await
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = create_fixture().await;
    let response = fixture.server.get("/api/v1/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is healthy");
}

#[tokio::test]
async fn test_add_list_and_remove() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;

    // Add a movie
    let response = fixture.add_to_list(movie_id, "movie").await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["contentType"], "movie");
    assert_eq!(body["data"]["contentId"], movie_id.to_string());
    assert_eq!(body["data"]["user"], fixture.user.to_string());

    // It shows up with its content embedded
    let response = fixture.list(&[]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["results"][0]["content"]["title"], "Inception");
    assert_eq!(body["data"]["results"][0]["content"]["id"], movie_id.to_string());

    // Remove it
    let response = fixture
        .server
        .delete(LIST)
        .json(&json!({ "user": fixture.user, "contentId": movie_id }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Item removed from My List successfully");
    assert_eq!(body["data"]["contentId"], movie_id.to_string());

    let body: Value = fixture.list(&[]).await.json();
    assert_eq!(body["data"]["totalCount"], 0);
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let fixture = create_fixture().await;
    let show_id = fixture.add_tv_show("Breaking Bad").await;
    fixture.add_to_list(show_id, "tvshow").await.assert_status(StatusCode::CREATED);

    let response = fixture
        .server
        .get("/api/v1/mylist/")
        .add_query_param("user", fixture.user)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["results"][0]["contentType"], "tvshow");
    assert_eq!(body["data"]["results"][0]["content"]["episodes"][0]["seasonNumber"], 1);

    fixture
        .server
        .delete("/api/v1/mylist/")
        .json(&json!({ "user": fixture.user, "contentId": show_id }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_duplicate_add_is_rejected() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;

    fixture.add_to_list(movie_id, "movie").await.assert_status(StatusCode::CREATED);

    let response = fixture.add_to_list(movie_id, "movie").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Item already in My List");

    let body: Value = fixture.list(&[]).await.json();
    assert_eq!(body["data"]["totalCount"], 1);
}

#[tokio::test]
async fn test_add_for_unknown_user() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;

    let response = fixture
        .server
        .post(ADD)
        .json(&json!({
            "user": Uuid::new_v4(),
            "contentId": movie_id,
            "contentType": "movie"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_add_with_invalid_content_type() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;

    let response = fixture.add_to_list(movie_id, "podcast").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid content type");
}

#[tokio::test]
async fn test_add_with_mismatched_kind_is_content_not_found() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;

    let response = fixture.add_to_list(movie_id, "tvshow").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Content not found");
}

#[tokio::test]
async fn test_add_with_missing_fields() {
    let fixture = create_fixture().await;

    let response = fixture
        .server
        .post(ADD)
        .json(&json!({ "contentType": "movie" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User ID is required; Content ID is required");
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let fixture = create_fixture().await;

    let response = fixture
        .server
        .post(ADD)
        .text("{not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_requests_without_body_report_missing_fields() {
    let fixture = create_fixture().await;

    let response = fixture.server.post(ADD).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "User ID is required; Content ID is required; Content type is required"
    );

    let response = fixture.server.delete(LIST).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "User ID is required; Content ID is required");
}

#[tokio::test]
async fn test_remove_missing_item_is_404() {
    let fixture = create_fixture().await;

    let response = fixture
        .server
        .delete(LIST)
        .json(&json!({ "user": fixture.user, "contentId": Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Item not found in My List");
}

#[tokio::test]
async fn test_pagination() {
    let fixture = create_fixture().await;
    for title in ["Inception", "Interstellar", "Tenet"] {
        let id = fixture.add_movie(title).await;
        fixture.add_to_list(id, "movie").await.assert_status(StatusCode::CREATED);
    }

    let first: Value = fixture.list(&[("limit", "2"), ("page", "1")]).await.json();
    let second: Value = fixture.list(&[("limit", "2"), ("page", "2")]).await.json();

    assert_eq!(first["data"]["totalCount"], 3);
    assert_eq!(second["data"]["totalCount"], 3);

    let first = first["data"]["results"].as_array().unwrap().clone();
    let second = second["data"]["results"].as_array().unwrap().clone();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(first.iter().all(|item| item["id"] != second[0]["id"]));

    // skip takes precedence over page
    let skipped: Value = fixture
        .list(&[("limit", "2"), ("page", "1"), ("skip", "2")])
        .await
        .json();
    assert_eq!(skipped["data"]["results"][0]["id"], second[0]["id"]);
}

#[tokio::test]
async fn test_empty_list() {
    let fixture = create_fixture().await;

    let response = fixture.list(&[]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalCount"], 0);
    assert!(body["data"]["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_returns_filtered_count() {
    let fixture = create_fixture().await;
    let inception = fixture.add_movie("Inception").await;
    let bad = fixture.add_tv_show("Breaking Bad").await;
    fixture.add_to_list(inception, "movie").await.assert_status(StatusCode::CREATED);
    fixture.add_to_list(bad, "tvshow").await.assert_status(StatusCode::CREATED);

    let body: Value = fixture.list(&[("search", "INCEP")]).await.json();
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["results"][0]["content"]["title"], "Inception");

    // Blank search is ignored
    let body: Value = fixture.list(&[("search", "  ")]).await.json();
    assert_eq!(body["data"]["totalCount"], 2);
}

#[tokio::test]
async fn test_sorting_by_content_type() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;
    let show_id = fixture.add_tv_show("Breaking Bad").await;
    fixture.add_to_list(movie_id, "movie").await.assert_status(StatusCode::CREATED);
    fixture.add_to_list(show_id, "tvshow").await.assert_status(StatusCode::CREATED);

    let body: Value = fixture
        .list(&[("sortBy", "contentType"), ("sortOrder", "asc")])
        .await
        .json();
    assert_eq!(body["data"]["results"][0]["contentType"], "movie");
    assert_eq!(body["data"]["results"][1]["contentType"], "tvshow");
}

#[tokio::test]
async fn test_invalid_sort_field() {
    let fixture = create_fixture().await;

    let response = fixture.list(&[("sortBy", "title; DROP TABLE my_list")]).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid sort field");
}

#[tokio::test]
async fn test_list_requires_user() {
    let fixture = create_fixture().await;

    let response = fixture.server.get(LIST).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "User ID is required");
}

#[tokio::test]
async fn test_list_survives_deleted_content() {
    let fixture = create_fixture().await;
    let movie_id = fixture.add_movie("Inception").await;
    fixture.add_to_list(movie_id, "movie").await.assert_status(StatusCode::CREATED);
    fixture.store.remove_movie(movie_id).await;

    let body: Value = fixture.list(&[]).await.json();
    assert_eq!(body["data"]["totalCount"], 1);
    assert!(body["data"]["results"][0]["content"].is_null());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let fixture = create_fixture().await;
    let request_id = Uuid::new_v4().to_string();

    let response = fixture
        .server
        .get("/api/v1/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&request_id).unwrap(),
        )
        .await;
    assert_eq!(response.header("x-request-id"), request_id.as_str());

    // A fresh id is assigned when none is sent
    let response = fixture.server.get("/api/v1/health").await;
    let generated = response.header("x-request-id");
    assert!(Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}
