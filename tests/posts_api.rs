mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{bearer, seed_user, send, test_app};

#[tokio::test]
async fn create_list_like_comment_flow() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let alice_auth = bearer(alice);
    let bob_auth = bearer(bob);

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&alice_auth),
        Some(json!({ "text": "hello" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["authorName"], "alice");

    // Newest first, empty likes and comments
    let (status, body) = send(&app.router, "GET", "/api/posts", Some(&bob_auth), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["text"], "hello");
    assert_eq!(body["data"][0]["likes"], json!([]));
    assert_eq!(body["data"][0]["comments"], json!([]));

    // Like as alice
    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/posts/like/{}", post_id),
        Some(&alice_auth),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{ "user": alice }]));

    // Comment as bob
    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/api/posts/comment/{}", post_id),
        Some(&bob_auth),
        Some(json!({ "text": "nice" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["text"], "nice");
    assert_eq!(body["data"][0]["author"], json!(bob));
    Ok(())
}

#[tokio::test]
async fn post_text_is_required() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&bearer(alice)),
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["text"].is_string());
    Ok(())
}

#[tokio::test]
async fn double_like_is_a_conflict() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;
    let auth = bearer(alice);

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&auth),
        Some(json!({ "text": "hello" })),
    )
    .await?;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();
    let like_uri = format!("/api/posts/like/{}", post_id);

    send(&app.router, "PUT", &like_uri, Some(&auth), None).await?;
    let (status, body) = send(&app.router, "PUT", &like_uri, Some(&auth), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // Still exactly one like entry
    let (_, body) = send(
        &app.router,
        "GET",
        &format!("/api/posts/{}", post_id),
        Some(&auth),
        None,
    )
    .await?;
    assert_eq!(body["data"]["likes"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn unlike_without_like_is_a_conflict() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;
    let auth = bearer(alice);

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&auth),
        Some(json!({ "text": "hello" })),
    )
    .await?;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/posts/unlike/{}", post_id),
        Some(&auth),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn only_the_author_may_delete_a_post() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let alice_auth = bearer(alice);

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&alice_auth),
        Some(json!({ "text": "hello" })),
    )
    .await?;
    let post_uri = format!("/api/posts/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app.router, "DELETE", &post_uri, Some(&bearer(bob)), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Unchanged for the author
    let (status, _) = send(&app.router, "GET", &post_uri, Some(&alice_auth), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, "DELETE", &post_uri, Some(&alice_auth), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, "GET", &post_uri, Some(&alice_auth), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_post_ids_are_not_found() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;
    let auth = bearer(alice);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/posts/not-a-uuid",
        Some(&auth),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app.router,
        "GET",
        &format!("/api/posts/{}", uuid::Uuid::new_v4()),
        Some(&auth),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn comment_deletion_is_author_scoped() -> Result<()> {
    let app = test_app();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let alice_auth = bearer(alice);
    let bob_auth = bearer(bob);

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&alice_auth),
        Some(json!({ "text": "hello" })),
    )
    .await?;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app.router,
        "POST",
        &format!("/api/posts/comment/{}", post_id),
        Some(&bob_auth),
        Some(json!({ "text": "nice" })),
    )
    .await?;
    let comment_id = body["data"][0]["id"].as_str().unwrap().to_string();
    let delete_uri = format!("/api/posts/comment/{}/{}", post_id, comment_id);

    // Post author is not the comment author
    let (status, _) = send(&app.router, "DELETE", &delete_uri, Some(&alice_auth), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app.router, "DELETE", &delete_uri, Some(&bob_auth), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    // Gone now
    let (status, _) = send(&app.router, "DELETE", &delete_uri, Some(&bob_auth), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = test_app();
    let (status, body) = send(&app.router, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}
