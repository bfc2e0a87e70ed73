//! Route table and middleware stack.

use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::metrics;
use crate::state::AppState;

/// Builds the application router. Mounted under `/` so the binary may nest
/// it wherever it likes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/token-refresh", post(handlers::refresh_token))
        .route(
            "/api/user/{username}",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/friends/request", post(handlers::request_friend))
        .route("/api/friends/requests", get(handlers::list_friend_requests))
        .route(
            "/api/friends/requests/{id}",
            put(handlers::respond_friend_request),
        )
        .route(
            "/api/content",
            post(handlers::create_content).get(handlers::list_own_content),
        )
        .route("/api/content/user/{owner}", get(handlers::list_user_content))
        .route(
            "/api/content/{title}/comments",
            post(handlers::create_comment).get(handlers::list_comments),
        )
        .route(
            "/api/content/{title}/ratings",
            post(handlers::create_rating).get(handlers::list_ratings),
        )
        .layer(middleware::from_fn_with_state(state.clone(), metrics::track))
        .layer(TraceLayer::new_for_http())
        .layer(cors_policy())
        .with_state(state)
}

// Permissive CORS; the API is bearer-token authenticated and served to
// first-party clients on other origins.
fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any)
}
