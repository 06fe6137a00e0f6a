mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use link_rotator::infrastructure::store::KeyValueStore;

#[tokio::test]
async fn test_get_block_size_when_unset() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .get("/admin/blocksize")
        .add_query_param("token", common::TOKEN)
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"ok": true, "value": null})
    );
}

#[tokio::test]
async fn test_set_then_get_block_size() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .post("/admin/blocksize")
        .add_query_param("token", common::TOKEN)
        .json(&json!({"value": 5}))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"ok": true, "saved": true, "value": 5})
    );
    assert_eq!(ctx.store.get("blocksize").await.unwrap().as_deref(), Some("5"));

    let current = server
        .get("/admin/blocksize")
        .add_query_param("token", common::TOKEN)
        .await
        .json::<serde_json::Value>();
    assert_eq!(current["value"], 5);
}

#[tokio::test]
async fn test_set_block_size_from_numeric_string() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .post("/admin/blocksize")
        .add_query_param("token", common::TOKEN)
        .json(&json!({"value": "3"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["value"], 3);
}

#[tokio::test]
async fn test_set_block_size_out_of_range() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    for body in [
        json!({"value": 0}),
        json!({"value": 21}),
        json!({"value": "abc"}),
        json!({}),
        json!("3"),
    ] {
        let response = server
            .post("/admin/blocksize")
            .add_query_param("token", common::TOKEN)
            .json(&body)
            .await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "invalid_value",
            "body {body}"
        );
    }

    assert_eq!(ctx.store.get("blocksize").await.unwrap(), None);
}

#[tokio::test]
async fn test_set_block_size_malformed_body() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .post("/admin/blocksize")
        .add_query_param("token", common::TOKEN)
        .text("{value: 3")
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["error"], "bad_body");
}

#[tokio::test]
async fn test_out_of_range_stored_value_is_clamped() {
    let ctx = common::create_test_context();
    let urls: Vec<String> = (1..=3).map(|i| format!("https://wa.me/{i}")).collect();
    let entries: Vec<(&str, &str)> = urls.iter().map(|url| ("", url.as_str())).collect();
    common::seed_links(ctx.store.as_ref(), &entries).await;
    ctx.store.set("blocksize", "25").await.unwrap();

    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .get("/admin/blocksize")
        .add_query_param("token", common::TOKEN)
        .await;
    assert_eq!(response.json::<serde_json::Value>()["value"], 25);

    for _ in 0..20 {
        let redirect = server.get("/r").await;
        redirect.assert_status(StatusCode::FOUND);
        assert_eq!(
            redirect.header("location").to_str().unwrap(),
            "https://wa.me/1"
        );
    }

    let redirect = server.get("/r").await;
    assert_eq!(
        redirect.header("location").to_str().unwrap(),
        "https://wa.me/2"
    );
}
