use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::panic_response,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    with_layers(Router::new().nest("/api/v1", api_routes())).with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/mylist/addToMyList", post(handlers::add_to_my_list))
        .route(
            "/mylist",
            get(handlers::get_my_list).delete(handlers::remove_from_my_list),
        )
        .route(
            "/mylist/",
            get(handlers::get_my_list).delete(handlers::remove_from_my_list),
        )
}

/// Shared middleware stack, outermost first. Panics are caught inside the
/// request id layer.
fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}
