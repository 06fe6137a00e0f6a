mod common;

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use std::net::SocketAddr;

use link_rotator::routes::api_router;

fn server() -> TestServer {
    let ctx = common::create_test_context();
    let app = api_router(ctx.state, false).into_make_service_with_connect_info::<SocketAddr>();
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_cors_headers_on_public_routes() {
    let server = server();

    let response = server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://panel.example"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .to_str()
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_admin_routes_are_authenticated() {
    let server = server();

    server.get("/admin/links").await.assert_status_unauthorized();

    server
        .get("/admin/links")
        .add_query_param("token", common::TOKEN)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_admin_routes_are_rate_limited() {
    let server = server();

    let mut statuses = Vec::new();
    let mut rejected = None;
    for _ in 0..15 {
        let response = server
            .get("/admin/blocksize")
            .add_query_param("token", common::TOKEN)
            .await;
        statuses.push(response.status_code());
        if response.status_code() == StatusCode::TOO_MANY_REQUESTS && rejected.is_none() {
            rejected = Some(response.json::<serde_json::Value>());
        }
    }

    assert_eq!(statuses[0], StatusCode::OK);
    let body = rejected.expect("no request was rate limited");
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "rate_limited");
}

#[tokio::test]
async fn test_redirect_is_not_rate_limited() {
    let server = server();

    for _ in 0..15 {
        server.get("/r").await.assert_status_not_found();
    }
}
