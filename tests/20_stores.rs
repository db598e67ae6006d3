mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{create_item, create_store, create_tag, TestApp};

#[tokio::test]
async fn create_list_and_get_stores() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.login_as("admin").await?;

    let (status, body) = app.post("/store", Some(&token), json!({ "name": "  Corner Shop " })).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Corner Shop");
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["tags"], json!([]));
    let store_id = body["data"]["id"].as_i64().unwrap();

    create_store(&app, &token, "Market").await?;

    let (status, body) = app.get("/store").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.get(&format!("/store/{}", store_id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], store_id);
    Ok(())
}

#[tokio::test]
async fn store_names_are_validated_and_unique() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.login_as("admin").await?;
    create_store(&app, &token, "Shop").await?;

    let (status, body) = app.post("/store", Some(&token), json!({ "name": "Shop" })).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, body) = app.post("/store", Some(&token), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["name"], "This field is required");

    let long = "x".repeat(81);
    let (status, _) = app.post("/store", Some(&token), json!({ "name": long })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_store_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, body) = app.get("/store/42").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app.get("/store/not-a-number").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn store_delete_needs_admin() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (admin, _) = app.login_as("admin").await?;
    let (user, _) = app.login_as("bob").await?;
    let store_id = create_store(&app, &admin, "Shop").await?;

    let (status, body) = app.delete(&format!("/store/{}", store_id), &user).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin privilege required.");

    let (status, body) = app.delete(&format!("/store/{}", store_id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Store deleted.");

    let (status, _) = app.delete(&format!("/store/{}", store_id), &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn store_delete_cascades_to_items_and_tags() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (admin, _) = app.login_as("admin").await?;
    let store_id = create_store(&app, &admin, "Shop").await?;
    let item_id = create_item(&app, &admin, store_id, "Chair", 10.0).await?;
    let tag_id = create_tag(&app, &admin, store_id, "furniture").await?;

    let (status, _) = app
        .post(&format!("/item/{}/tag/{}", item_id, tag_id), Some(&admin), json!({}))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get(&format!("/store/{}", store_id)).await?;
    assert_eq!(body["data"]["items"][0]["name"], "Chair");
    assert_eq!(body["data"]["tags"][0]["name"], "furniture");

    let (status, _) = app.delete(&format!("/store/{}", store_id), &admin).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/item/{}", item_id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/tag/{}", tag_id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
