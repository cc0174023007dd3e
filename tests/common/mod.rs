use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use devconnect_api::auth::{generate_token, Claims};
use devconnect_api::models::UserRecord;
use devconnect_api::store::memory::MemoryStore;

/// Router over a fresh in-memory store, plus the store handle for seeding.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let router = devconnect_api::app(store.clone());
    TestApp { router, store }
}

pub async fn seed_user(store: &MemoryStore, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    store
        .seed_user(UserRecord {
            id,
            name: name.to_string(),
            avatar: Some(format!("//gravatar/{}", name)),
        })
        .await;
    id
}

/// Mint a bearer token the way the external auth service would, using the
/// shared secret from config.
pub fn bearer(user_id: Uuid) -> String {
    let token = generate_token(Claims::new(user_id)).expect("token generation");
    format!("Bearer {}", token)
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}
