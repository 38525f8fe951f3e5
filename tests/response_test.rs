use axum::http::StatusCode;
use axum::{middleware, routing::get, Router};
use axum_test::TestServer;
use serde_json::{json, Value};

use repokit::context::{propagate_ids, RequestContext, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use repokit::{ApiResponse, Error, ErrorCode};

async fn ping(ctx: RequestContext) -> ApiResponse<Value> {
    ApiResponse::success(json!({"pong": true})).with_context(&ctx)
}

async fn missing() -> Result<ApiResponse<Value>, Error> {
    Err(Error::not_found("note"))
}

fn test_server() -> TestServer {
    let app = Router::new()
        .route("/ping", get(ping))
        .route("/missing", get(missing))
        .layer(middleware::from_fn(propagate_ids));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn success_envelope_carries_a_minted_request_id() {
    let server = test_server();

    let response = server.get("/ping").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"]["pong"], true);

    let body_id = body["request_id"].as_str().expect("request id in body");
    let header_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("request id echoed on the response")
        .to_str()
        .unwrap();
    assert_eq!(body_id, header_id);
}

#[tokio::test]
async fn caller_supplied_request_id_is_adopted() {
    let server = test_server();

    let response = server
        .get("/ping")
        .add_header(REQUEST_ID_HEADER, "req-123")
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["request_id"], "req-123");
    let echoed = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(echoed, "req-123");
}

#[tokio::test]
async fn trace_id_flows_into_the_envelope() {
    let server = test_server();

    let response = server
        .get("/ping")
        .add_header(TRACE_ID_HEADER, "trace-42")
        .await;

    let body: Value = response.json();
    assert_eq!(body["trace_id"], "trace-42");
}

#[tokio::test]
async fn domain_error_maps_to_status_and_stable_code() {
    let server = test_server();

    let response = server.get("/missing").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], ErrorCode::NOT_FOUND.value());
    assert_eq!(body["message"], "note not found");
    assert!(body["data"].is_null());
    assert!(body["timestamp"].as_i64().unwrap() > 0);

    // The middleware still stamps the response header on failures.
    assert!(response.headers().get(REQUEST_ID_HEADER).is_some());
}
