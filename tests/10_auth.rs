mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_and_root_respond() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");

    let (status, body) = app.get("/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.state.pool.close().await;

    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn register_login_and_lookup_user() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app
        .post("/register", None, json!({ "username": "ann", "password": "hunter2" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["message"], "User created successfully.");

    let (status, body) = app
        .post("/login", None, json!({ "username": "ann", "password": "hunter2" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());

    let (status, body) = app.get("/user/1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "ann");
    assert!(body["data"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_username_conflicts() -> Result<()> {
    let app = TestApp::spawn().await?;

    assert_eq!(app.register("ann", "hunter2").await?, StatusCode::CREATED);
    assert_eq!(app.register("ann", "other-pw").await?, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn register_validates_fields() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app
        .post(
            "/register",
            None,
            json!({ "username": "  ", "password": "abc", "email": "not-an-email" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["username"].is_string());
    assert!(body["field_errors"]["password"].is_string());
    assert!(body["field_errors"]["email"].is_string());

    let (status, body) = app.request(Method::POST, "/register", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.register("ann", "hunter2").await?;

    for (username, password) in [("ann", "wrong-pw"), ("nobody", "hunter2")] {
        let (status, body) = app
            .post("/login", None, json!({ "username": username, "password": password }))
            .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_CREDENTIALS");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_alike() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.register("ann", "hunter2").await?;

    let (_, wrong_password) = app
        .post("/login", None, json!({ "username": "ann", "password": "nope-nope" }))
        .await?;
    let (_, unknown_user) = app
        .post("/login", None, json!({ "username": "bob", "password": "nope-nope" }))
        .await?;
    assert_eq!(wrong_password, unknown_user);
    assert!(!app.state.decoy_hash.is_empty());
    Ok(())
}

#[tokio::test]
async fn login_with_unrepresentable_expiry_fails_cleanly() -> Result<()> {
    let mut config = common::test_config();
    config.security.refresh_token_expiry_days = 100_000_000;
    let app = TestApp::with_config(config).await?;
    app.register("ann", "hunter2").await?;

    let (status, body) = app
        .post("/login", None, json!({ "username": "ann", "password": "hunter2" }))
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn out_of_range_expiry_is_rejected_at_startup() {
    let mut config = common::test_config();
    config.security.refresh_token_expiry_days = 1_000_000_000_000;
    assert!(TestApp::with_config(config).await.is_err());
}

#[tokio::test]
async fn welcome_email_is_queued_when_address_given() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, _) = app
        .post(
            "/register",
            None,
            json!({ "username": "ann", "password": "hunter2", "email": "ann@example.com" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let sent = app.wait_for_emails(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ann@example.com");
    assert!(sent[0].html_body.contains("ann"));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app.post("/store", None, json!({ "name": "Shop" })).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTHORIZATION_REQUIRED");

    let (status, body) = app
        .post("/store", Some("not-a-jwt"), json!({ "name": "Shop" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");
    Ok(())
}

#[tokio::test]
async fn refresh_issues_non_fresh_access_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (access, refresh) = app.login_as("admin").await?;

    // Access tokens are not accepted on /refresh and vice versa
    let (status, body) = app.post("/refresh", Some(&access), json!({})).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");

    let (status, body) = app.post("/refresh", Some(&refresh), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    let stale = body["data"]["access_token"].as_str().unwrap().to_string();

    let store_id = common::create_store(&app, &stale, "Shop").await?;
    let (status, body) = app.delete(&format!("/store/{}", store_id), &stale).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "FRESH_TOKEN_REQUIRED");

    let (status, _) = app.delete(&format!("/store/{}", store_id), &access).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_presented_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (access, refresh) = app.login_as("ann").await?;

    let (status, body) = app.post("/logout", Some(&access), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Successfully logged out");

    let (status, body) = app.post("/logout", Some(&access), json!({})).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_REVOKED");

    // The refresh token is untouched
    let (status, _) = app.post("/refresh", Some(&refresh), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn expired_tokens_are_rejected() -> Result<()> {
    let mut config = common::test_config();
    config.security.access_token_expiry_minutes = -10;
    let app = TestApp::with_config(config).await?;
    let (access, _) = app.login_as("ann").await?;

    let (status, body) = app.post("/logout", Some(&access), json!({})).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_EXPIRED");
    Ok(())
}

#[tokio::test]
async fn users_delete_themselves_unless_admin() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (admin, _) = app.login_as("admin").await?;
    let (bob, _) = app.login_as("bob").await?;
    app.login_as("carol").await?;

    let (status, body) = app.delete("/user/1", &bob).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = app.delete("/user/2", &bob).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/user/2").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/user/3", &admin).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete("/user/3", &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}
