//! Backend agent-query contract tests.
//!
//! These verify the exact HTTP exchange with the backend: method, path,
//! secret header, request body shape, and how responses and failures come
//! back to the dialogue engine as JSON text.

use serde_json::{Value, json};
use smartq_voice::ToolDispatcher;
use smartq_voice::backend::BackendClient;
use smartq_voice::config::BackendConfig;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/api/voice/agent-query";
const SECRET: &str = "test-secret";

fn dispatcher_for(server: &MockServer) -> ToolDispatcher {
    let config = BackendConfig {
        base_url: server.uri(),
        agent_secret: SECRET.to_owned(),
        ..BackendConfig::default()
    };
    let client = BackendClient::new(&config).expect("build client");
    ToolDispatcher::smartq(Arc::new(client))
}

fn parse(output: &str) -> Value {
    serde_json::from_str(output).expect("tool output is JSON")
}

async fn expect_body(server: &MockServer, body: Value, reply: Value) {
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("x-agent-secret", SECRET))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .expect(1)
        .mount(server)
        .await;
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn room_queue_posts_room_code_and_returns_payload_verbatim() {
    let server = MockServer::start().await;
    let raw_body = r#"{"waiting":3,"etaMinutes":12}"#;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("x-agent-secret", SECRET))
        .and(body_json(
            json!({"action": "get_room_queue", "params": {"roomCode": "RM-ABC123"}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw_body, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let output = dispatcher_for(&server).get_room_queue("RM-ABC123").await;
    // Key order is the backend's, not alphabetical.
    assert_eq!(output, raw_body);
}

#[tokio::test]
async fn room_details_posts_room_code() {
    let server = MockServer::start().await;
    let payload = json!({"name": "Pharmacy counter", "status": "open"});
    expect_body(
        &server,
        json!({"action": "get_room_details", "params": {"roomCode": "RM-XYZ789"}}),
        payload.clone(),
    )
    .await;

    let output = dispatcher_for(&server).get_room_details("RM-XYZ789").await;
    assert_eq!(parse(&output), payload);
}

#[tokio::test]
async fn shop_details_posts_identifier() {
    let server = MockServer::start().await;
    let payload = json!({"shop": "Corner Bakery", "rooms": []});
    expect_body(
        &server,
        json!({"action": "get_shop_details", "params": {"identifier": "corner-bakery"}}),
        payload.clone(),
    )
    .await;

    let output = dispatcher_for(&server).get_shop_details("corner-bakery").await;
    assert_eq!(parse(&output), payload);
}

#[tokio::test]
async fn browse_without_filters_sends_empty_params() {
    let server = MockServer::start().await;
    let payload = json!({"rooms": [{"code": "RM-ABC123"}]});
    expect_body(
        &server,
        json!({"action": "browse_rooms", "params": {}}),
        payload.clone(),
    )
    .await;

    let output = dispatcher_for(&server).browse_rooms(None, None).await;
    assert_eq!(parse(&output), payload);
}

#[tokio::test]
async fn browse_with_search_only_omits_category() {
    let server = MockServer::start().await;
    expect_body(
        &server,
        json!({"action": "browse_rooms", "params": {"search": "pharmacy"}}),
        json!({"rooms": []}),
    )
    .await;

    let output = dispatcher_for(&server)
        .browse_rooms(Some("pharmacy"), Some("   "))
        .await;
    assert_eq!(parse(&output), json!({"rooms": []}));
}

#[tokio::test]
async fn invoke_by_name_uses_engine_arguments() {
    let server = MockServer::start().await;
    expect_body(
        &server,
        json!({"action": "browse_rooms", "params": {"category": "clinic", "search": "dental"}}),
        json!({"rooms": []}),
    )
    .await;

    let output = dispatcher_for(&server)
        .invoke("browse_rooms", &json!({"search": "dental", "category": "clinic"}))
        .await;
    assert_eq!(parse(&output), json!({"rooms": []}));
}

#[tokio::test]
async fn backend_error_body_passes_through() {
    let server = MockServer::start().await;
    let payload = json!({"error": "Room not found"});
    expect_body(
        &server,
        json!({"action": "get_room_queue", "params": {"roomCode": "RM-NOPE00"}}),
        payload.clone(),
    )
    .await;

    let output = dispatcher_for(&server).get_room_queue("RM-NOPE00").await;
    assert_eq!(parse(&output), payload);
}

// ────────────────────────────────────────────────────────────────────────────
// Failures
// ────────────────────────────────────────────────────────────────────────────

fn error_message(output: &str) -> String {
    let value = parse(output);
    let object = value.as_object().expect("error output is an object");
    assert_eq!(object.len(), 1, "error output has only the error key");
    object["error"].as_str().expect("error is a string").to_owned()
}

#[tokio::test]
async fn server_error_becomes_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let output = dispatcher_for(&server).get_room_queue("RM-ABC123").await;
    let message = error_message(&output);
    assert!(message.starts_with("Could not reach backend: "), "{message}");
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn rejected_secret_becomes_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})))
        .mount(&server)
        .await;

    let output = dispatcher_for(&server).browse_rooms(None, None).await;
    assert!(error_message(&output).contains("401"));
}

#[tokio::test]
async fn non_json_body_becomes_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let output = dispatcher_for(&server).get_shop_details("corner-bakery").await;
    assert!(error_message(&output).starts_with("Could not reach backend: "));
}

#[tokio::test]
async fn unreachable_backend_becomes_error_object() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher_for(&server);
    drop(server);

    let output = dispatcher.get_room_details("RM-ABC123").await;
    assert!(error_message(&output).starts_with("Could not reach backend: "));
}

#[tokio::test]
async fn blank_required_argument_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let output = dispatcher.get_room_queue("  ").await;
    assert!(error_message(&output).contains("room_code"));

    let output = dispatcher.invoke("get_shop_details", &json!({})).await;
    assert!(error_message(&output).contains("identifier"));
}

#[tokio::test]
async fn unknown_tool_is_reported_without_backend_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let output = dispatcher_for(&server).invoke("order_pizza", &json!({})).await;
    assert_eq!(error_message(&output), "Unknown tool: order_pizza");
}
