// End-to-end tests over a real socket

mod common;

use common::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use signa_core::ServerConfig;
use signa_eye::NullExtractor;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(server: &TestServer, path: &str) -> Client {
    let (client, _) = connect_async(server.ws_url(path)).await.unwrap();
    client
}

async fn exchange(client: &mut Client, message: Message) -> Value {
    client.send(message).await.unwrap();
    next_json(client).await
}

async fn next_json(client: &mut Client) -> Value {
    let reply = tokio::time::timeout(Duration::from_secs(10), client.next())
        .await
        .expect("no reply within deadline")
        .expect("stream ended")
        .unwrap();
    serde_json::from_str(&reply.into_text().unwrap()).unwrap()
}

#[tokio::test]
async fn test_open_hand_without_model_is_hello() {
    let state = rule_based_state(Arc::new(StubExtractor(open_hand())), &ServerConfig::default());
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;

    let reply = exchange(&mut client, Message::Text(frame_message())).await;
    assert_eq!(reply["hand_detected"], json!(true));
    assert_eq!(reply["gesture"], json!("Hello"));
    assert_eq!(reply["confidence"], json!(0.8));
    assert_eq!(reply["classifier"], json!("geometric"));
    assert_eq!(reply["landmarks"].as_array().unwrap().len(), 21);
    assert!(reply["timestamp"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_no_hand_response() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/ws").await;

    let reply = exchange(&mut client, Message::Text(frame_message())).await;
    assert_eq!(reply["hand_detected"], json!(false));
    assert_eq!(reply["gesture"], json!("None"));
    assert_eq!(reply["confidence"], json!(0.0));
    assert_eq!(reply["landmarks"], json!([]));
    assert_eq!(reply["classifier"], Value::Null);
}

#[tokio::test]
async fn test_protocol_errors_keep_session_open() {
    let state = rule_based_state(Arc::new(StubExtractor(open_hand())), &ServerConfig::default());
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;

    let reply = exchange(&mut client, Message::Text(r#"{"image": "abc"}"#.to_string())).await;
    assert_eq!(reply, json!({"error": "No frame data received"}));

    let reply = exchange(&mut client, Message::Text("not json".to_string())).await;
    assert!(reply["error"].as_str().unwrap().starts_with("Invalid message format: "));

    let reply = exchange(&mut client, Message::Binary(vec![1, 2, 3])).await;
    assert_eq!(
        reply,
        json!({"error": "Invalid message format: binary frames are not supported"})
    );

    // "not an image", base64-encoded
    let reply = exchange(
        &mut client,
        Message::Text(json!({"frame": "data:image/png;base64,bm90IGFuIGltYWdl"}).to_string()),
    )
    .await;
    assert_eq!(reply, json!({"error": "Failed to decode image"}));

    let reply = exchange(
        &mut client,
        Message::Text(json!({"frame": "data:image/png;base64,"}).to_string()),
    )
    .await;
    assert!(reply["error"].as_str().unwrap().starts_with("Image decoding failed: "));

    let reply = exchange(&mut client, Message::Text(json!({"frame": "%%%%"}).to_string())).await;
    assert!(reply["error"].as_str().unwrap().starts_with("Image decoding failed: "));

    // Same session still classifies
    let reply = exchange(&mut client, Message::Text(frame_message())).await;
    assert_eq!(reply["gesture"], json!("Hello"));
}

#[tokio::test]
async fn test_one_response_per_frame_in_order() {
    let state = rule_based_state(Arc::new(StubExtractor(open_hand())), &ServerConfig::default());
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;

    client.send(Message::Text(frame_message())).await.unwrap();
    client.send(Message::Text("{}".to_string())).await.unwrap();
    client.send(Message::Text(frame_message())).await.unwrap();

    assert_eq!(next_json(&mut client).await["gesture"], json!("Hello"));
    assert_eq!(next_json(&mut client).await["error"], json!("No frame data received"));
    assert_eq!(next_json(&mut client).await["gesture"], json!("Hello"));
}

#[tokio::test]
async fn test_connection_count_tracks_sessions() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let server = TestServer::start(state).await;
    assert_eq!(server.state.sessions.count(), 0);

    let mut first = connect(&server, "/asl-ws").await;
    let mut second = connect(&server, "/asl-ws").await;
    assert!(server.wait_for_sessions(2).await);

    first.close(None).await.unwrap();
    assert!(server.wait_for_sessions(1).await);

    // Dropping the transport without a close handshake also deregisters
    drop(second.send(Message::Text(frame_message())).await);
    drop(second);
    assert!(server.wait_for_sessions(0).await);
}

#[tokio::test]
async fn test_capacity_rejects_extra_sessions() {
    let config = ServerConfig {
        max_sessions: 1,
        ..ServerConfig::default()
    };
    let state = rule_based_state(Arc::new(NullExtractor), &config);
    let server = TestServer::start(state).await;

    let _first = connect(&server, "/asl-ws").await;
    assert!(server.wait_for_sessions(1).await);

    let mut second = connect(&server, "/asl-ws").await;
    let reply = next_json(&mut second).await;
    assert_eq!(reply, json!({"error": "Maximum sessions (1) reached"}));
    assert_eq!(server.state.sessions.count(), 1);
}

#[tokio::test]
async fn test_frame_timeout() {
    let config = ServerConfig {
        frame_timeout_ms: 20,
        ..ServerConfig::default()
    };
    let state = rule_based_state(Arc::new(SlowExtractor(Duration::from_millis(300))), &config);
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;

    let reply = exchange(&mut client, Message::Text(frame_message())).await;
    assert_eq!(reply, json!({"error": "Frame processing timed out"}));

    let reply = exchange(&mut client, Message::Text("{}".to_string())).await;
    assert_eq!(reply, json!({"error": "No frame data received"}));
}

#[tokio::test]
async fn test_oversized_message_is_protocol_error() {
    let config = ServerConfig {
        max_frame_bytes: 64,
        ..ServerConfig::default()
    };
    let state = rule_based_state(Arc::new(NullExtractor), &config);
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;

    let reply = exchange(&mut client, Message::Text(frame_message())).await;
    assert!(reply["error"].as_str().unwrap().contains("exceeds"));

    let reply = exchange(&mut client, Message::Text("{}".to_string())).await;
    assert_eq!(reply, json!({"error": "No frame data received"}));
}

#[tokio::test]
async fn test_disconnect_mid_frame_releases_session() {
    let state = rule_based_state(Arc::new(SlowExtractor(Duration::from_secs(3))), &ServerConfig::default());
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;
    assert!(server.wait_for_sessions(1).await);

    client.send(Message::Text(frame_message())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let dropped_at = Instant::now();
    drop(client);

    assert!(server.wait_for_sessions(0).await);
    assert!(dropped_at.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_messages_during_slow_frame_are_answered_in_order() {
    let state = rule_based_state(
        Arc::new(SlowExtractor(Duration::from_millis(200))),
        &ServerConfig::default(),
    );
    let server = TestServer::start(state).await;
    let mut client = connect(&server, "/asl-ws").await;

    client.send(Message::Text(frame_message())).await.unwrap();
    client.send(Message::Text("{}".to_string())).await.unwrap();
    client.send(Message::Binary(vec![0])).await.unwrap();

    assert_eq!(next_json(&mut client).await["hand_detected"], json!(true));
    assert_eq!(next_json(&mut client).await["error"], json!("No frame data received"));
    assert_eq!(
        next_json(&mut client).await["error"],
        json!("Invalid message format: binary frames are not supported")
    );
}
