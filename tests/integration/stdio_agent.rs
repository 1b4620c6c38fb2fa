//! End-to-end conversation over the JSON-lines transport.
//!
//! A scripted speech pipeline talks to the orchestrator through in-memory
//! pipes while the backend is a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use smartq_voice::backend::BackendClient;
use smartq_voice::config::BackendConfig;
use smartq_voice::host::JsonLinePipeline;
use smartq_voice::personality::GREETING_INSTRUCTIONS;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::bootstrap_with;

async fn next_event(lines: &mut Lines<BufReader<DuplexStream>>) -> Value {
    let line = tokio::time::timeout(Duration::from_secs(5), lines.next_line())
        .await
        .expect("host event within timeout")
        .expect("read host output")
        .expect("host output open");
    serde_json::from_str(&line).expect("host event is JSON")
}

async fn send(writer: &mut DuplexStream, message: Value) {
    let mut line = message.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await.expect("write to host");
}

#[tokio::test]
async fn scripted_session_over_json_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/voice/agent-query"))
        .and(header("x-agent-secret", "stdio-secret"))
        .and(body_json(
            json!({"action": "get_room_queue", "params": {"roomCode": "RM-ABC123"}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"waiting": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let config = BackendConfig {
        base_url: server.uri(),
        agent_secret: "stdio-secret".to_owned(),
        ..BackendConfig::default()
    };
    let backend = Arc::new(BackendClient::new(&config).unwrap());
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("latency.txt");
    let bootstrap = bootstrap_with(backend, &log_path);

    let (host_in, mut to_host) = tokio::io::duplex(8192);
    let (host_out, from_host) = tokio::io::duplex(8192);
    let mut from_host = BufReader::new(from_host).lines();
    let mut pipeline = JsonLinePipeline::new(host_in, host_out);

    let live = bootstrap.start(&mut pipeline).await.unwrap();

    let started = next_event(&mut from_host).await;
    assert_eq!(started["type"], "session_started");
    assert_eq!(started["tools"].as_array().map(Vec::len), Some(4));
    let greeting = next_event(&mut from_host).await;
    assert_eq!(
        greeting,
        json!({"type": "generate_reply", "instructions": GREETING_INSTRUCTIONS})
    );

    send(
        &mut to_host,
        json!({"type": "agent_state_changed", "old_state": "listening", "new_state": "thinking"}),
    )
    .await;
    send(
        &mut to_host,
        json!({
            "type": "tool_call",
            "call_id": "call-1",
            "name": "get_room_queue",
            "arguments": {"room_code": "RM-ABC123"}
        }),
    )
    .await;

    let result = next_event(&mut from_host).await;
    assert_eq!(result["type"], "tool_result");
    assert_eq!(result["call_id"], "call-1");
    let output: Value = serde_json::from_str(result["output"].as_str().unwrap()).unwrap();
    assert_eq!(output, json!({"waiting": 3}));

    send(
        &mut to_host,
        json!({"type": "agent_state_changed", "new_state": "speaking"}),
    )
    .await;
    send(&mut to_host, json!({"type": "session_end"})).await;

    let stats = live.closed().await.unwrap();
    pipeline.finished().await.unwrap();
    assert_eq!(stats.measured, 1);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("] Response latency: "));
}

#[tokio::test]
async fn eof_ends_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let backend = crate::helpers::StaticBackend::new(smartq_voice::ToolResult::Payload(json!({})));
    let bootstrap = bootstrap_with(backend, &dir.path().join("latency.txt"));

    let (host_in, to_host) = tokio::io::duplex(8192);
    let (host_out, _from_host) = tokio::io::duplex(8192);
    let mut pipeline = JsonLinePipeline::new(host_in, host_out);
    let live = bootstrap.start(&mut pipeline).await.unwrap();

    drop(to_host);
    let stats = tokio::time::timeout(Duration::from_secs(5), live.closed())
        .await
        .expect("session closes on EOF")
        .unwrap();
    pipeline.finished().await.unwrap();
    assert_eq!(stats.transitions, 0);
}
