mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{bearer, seed_user, send, test_app};

#[tokio::test]
async fn upsert_then_get_me_round_trips() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;
    let auth = bearer(user);

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&auth),
        Some(json!({
            "status": "Developer",
            "skills": "node, react, mongo",
            "company": "Initech",
            "twitter": "https://twitter.com/ada"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["skills"], json!(["node", "react", "mongo"]));
    assert_eq!(body["data"]["social"]["twitter"], "https://twitter.com/ada");

    let (status, body) = send(&app.router, "GET", "/api/profile/me", Some(&auth), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Developer");
    assert_eq!(body["data"]["company"], "Initech");
    assert_eq!(body["data"]["user"]["name"], "ada");
    Ok(())
}

#[tokio::test]
async fn upsert_validation_lists_every_violation() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&bearer(user)),
        Some(json!({ "company": "Initech" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["status"].is_string());
    assert!(body["field_errors"]["skills"].is_string());
    Ok(())
}

#[tokio::test]
async fn merge_patch_keeps_omitted_fields() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;
    let auth = bearer(user);

    send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&auth),
        Some(json!({ "status": "Developer", "skills": "rust", "bio": "hi" })),
    )
    .await?;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&auth),
        Some(json!({ "status": "Architect", "skills": "rust, go" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Architect");
    assert_eq!(body["data"]["bio"], "hi");
    Ok(())
}

#[tokio::test]
async fn profile_list_is_public() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;
    send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&bearer(user)),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await?;

    let (status, body) = send(&app.router, "GET", "/api/profile", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn profile_by_user_handles_malformed_and_absent_ids() -> Result<()> {
    let app = test_app();

    let (status, body) =
        send(&app.router, "GET", "/api/profile/user/not-a-uuid", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let uri = format!("/api/profile/user/{}", Uuid::new_v4());
    let (status, _) = send(&app.router, "GET", &uri, None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let app = test_app();

    let (status, body) = send(&app.router, "GET", "/api/profile/me", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/profile/me",
        Some("Bearer garbage"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn experience_add_and_remove_by_id() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;
    let auth = bearer(user);

    send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&auth),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await?;

    let (status, body) = send(
        &app.router,
        "PUT",
        "/api/profile/experience",
        Some(&auth),
        Some(json!({
            "title": "Engineer",
            "company": "Initech",
            "from": "2019-01-01"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let exp_id = body["data"]["experience"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        "DELETE",
        &format!("/api/profile/experience/{}", exp_id),
        Some(&auth),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["experience"].as_array().unwrap().is_empty());

    // Removing it again is a 404, not a silent success
    let (status, _) = send(
        &app.router,
        "DELETE",
        &format!("/api/profile/experience/{}", exp_id),
        Some(&auth),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn education_requires_its_fields() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;
    let auth = bearer(user);

    send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&auth),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await?;

    let (status, body) = send(
        &app.router,
        "PUT",
        "/api/profile/education",
        Some(&auth),
        Some(json!({ "school": "MIT" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["degree"].is_string());
    assert!(body["field_errors"]["fieldOfStudy"].is_string());
    assert!(body["field_errors"]["from"].is_string());
    Ok(())
}

#[tokio::test]
async fn delete_account_removes_profile_but_not_posts() -> Result<()> {
    let app = test_app();
    let user = seed_user(&app.store, "ada").await;
    let auth = bearer(user);

    send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&auth),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await?;
    send(
        &app.router,
        "POST",
        "/api/posts",
        Some(&auth),
        Some(json!({ "text": "hello" })),
    )
    .await?;

    let (status, body) = send(&app.router, "DELETE", "/api/profile", Some(&auth), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["msg"], "User deleted");

    let (_, body) = send(&app.router, "GET", "/api/profile", None, None).await?;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Posts survive account deletion (no cascade)
    let other = seed_user(&app.store, "bob").await;
    let (_, body) = send(&app.router, "GET", "/api/posts", Some(&bearer(other)), None).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    Ok(())
}
