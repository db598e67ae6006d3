mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, doc) = app.get("/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "Stores REST API");

    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/store/{id}"));
    assert!(paths.contains_key("/item/{id}/tag/{tag_id}"));
    assert!(doc["paths"]["/store/{id}"]["delete"]["security"].is_array());
    Ok(())
}
