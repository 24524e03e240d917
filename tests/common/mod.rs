#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use chat_edge::{AppState, Config, SharedState};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const UPSTREAM_PATH: &str = "/v1/chat/completions";

/// What the fake upstream saw on its last call.
#[derive(Debug, Clone, Default)]
pub struct Seen {
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

pub type SeenHandle = Arc<Mutex<Seen>>;

/// Start an upstream that answers every POST with `status` and a JSON `body`.
pub async fn spawn_upstream(status: StatusCode, body: Value) -> (String, SeenHandle) {
    let seen: SeenHandle = Arc::default();
    let recorder = seen.clone();

    let app = Router::new().route(
        UPSTREAM_PATH,
        post(move |headers: HeaderMap, Json(request): Json<Value>| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                let mut guard = recorder.lock().unwrap();
                guard.authorization = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                guard.body = Some(request);
                (status, Json(body))
            }
        }),
    );

    (serve(app).await, seen)
}

/// Start an upstream that answers with a raw, possibly non-JSON body.
pub async fn spawn_raw_upstream(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(UPSTREAM_PATH, post(move || async move { (status, body) }));
    serve(app).await
}

/// Start an upstream speaking raw HTTP/1.1: it reads each request, writes
/// `reply` verbatim and closes, so the reply can lie about its length.
pub async fn spawn_tcp_upstream(reply: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}{UPSTREAM_PATH}")
}

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + body_len {
            return;
        }
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}{UPSTREAM_PATH}")
}

pub fn config_for(upstream_url: &str) -> Config {
    Config {
        upstream_url: upstream_url.to_string(),
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
        system_prompt: "You are a test assistant.".to_string(),
        ..Config::default()
    }
}

pub fn state_for(config: Config) -> SharedState {
    Arc::new(AppState::new(config).unwrap())
}
