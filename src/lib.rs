use std::sync::Arc;

use axum::extract::State;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use store::AggregateStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AggregateStore>,
}

/// Build the full application router over any store implementation.
/// Production wires in `PgStore`; the integration tests drive this with
/// `MemoryStore`.
pub fn app(store: Arc<dyn AggregateStore>) -> Router {
    let state = AppState { store };

    // Authentication happens per-handler through the AuthUser extractor;
    // routes without it are public.
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/api/profile",
            get(handlers::profile::list)
                .post(handlers::profile::upsert)
                .delete(handlers::profile::delete_account),
        )
        .route("/api/profile/me", get(handlers::profile::me))
        .route("/api/profile/user/:user_id", get(handlers::profile::by_user))
        .route("/api/profile/experience", put(handlers::profile::add_experience))
        .route(
            "/api/profile/experience/:exp_id",
            delete(handlers::profile::remove_experience),
        )
        .route("/api/profile/education", put(handlers::profile::add_education))
        .route(
            "/api/profile/education/:edu_id",
            delete(handlers::profile::remove_education),
        )
        .route(
            "/api/posts",
            post(handlers::posts::create).get(handlers::posts::list),
        )
        .route(
            "/api/posts/:id",
            get(handlers::posts::get).delete(handlers::posts::delete),
        )
        .route("/api/posts/like/:id", put(handlers::posts::like))
        .route("/api/posts/unlike/:id", put(handlers::posts::unlike))
        .route("/api/posts/comment/:id", post(handlers::posts::add_comment))
        .route(
            "/api/posts/comment/:id/:comment_id",
            delete(handlers::posts::delete_comment),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config::config().security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "DevConnect API",
            "version": version,
            "description": "Developer social network API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "profiles": "/api/profile[/me|/user/:user_id|/experience|/education] (mixed)",
                "posts": "/api/posts[/:id|/like/:id|/unlike/:id|/comment/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
