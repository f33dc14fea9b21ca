//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

use anatom_server::config::AppConfig;
use anatom_server::http::{AppState, HttpServer, UpstreamProxy};
use anatom_server::store::{Document, MemoryStore};
use anatom_server::RedirectFlag;

/// A stand-in for the frontend dev server.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a mock upstream on an ephemeral port that answers every request
/// with `200 OK` and a fixed body.
pub async fn start_mock_upstream(response: &'static str) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let response_str = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.len(),
                    response
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockUpstream { addr, hits }
}

/// Start a WebSocket dev server stand-in that answers each text frame with
/// `echo:<text>`. The request path of every handshake is recorded.
pub async fn start_ws_echo_upstream() -> (SocketAddr, Arc<std::sync::Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let paths = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = paths.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                    seen.lock().unwrap().push(request.uri().path().to_owned());
                    Ok(response)
                };
                let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(socket, callback).await else {
                    return;
                };
                while let Some(Ok(message)) = ws.next().await {
                    match message {
                        Message::Text(text) => {
                            let reply = format!("echo:{}", text.as_str());
                            if ws.send(Message::Text(reply.into())).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        _ => {}
                    }
                }
            });
        }
    });

    (addr, paths)
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// A store holding one body, `torso`, and a few structures.
pub fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new()
            .with_structures(vec![
                object(serde_json::json!({ "_id": "1", "type": "bone", "name": "femur" })),
                object(serde_json::json!({ "_id": "2", "type": "muscle", "name": "biceps" })),
                object(serde_json::json!({ "_id": "3", "type": "bone", "name": "ulna" })),
            ])
            .with_bodies(vec![object(serde_json::json!({
                "_id": "b1",
                "generals": { "name": "torso" },
                "bones": { "ribs": { "count": 24 }, "spine": { "count": 33 } },
                "skeleton": { "visible": true },
                "updatedAt": "2024-01-01T00:00:00Z"
            }))]),
    )
}

/// Server over `store`, proxying to `upstream`, optionally serving `static_dir`.
pub fn server(
    store: Arc<MemoryStore>,
    upstream: SocketAddr,
    static_dir: Option<&std::path::Path>,
    redirect: RedirectFlag,
) -> HttpServer {
    let config = AppConfig {
        static_dir: static_dir
            .map(|dir| dir.display().to_string())
            .unwrap_or_default(),
        react_port: upstream.port(),
        redirect_to_react: redirect.is_redirecting(),
        ..AppConfig::default()
    };
    let mut state = AppState::new(&config, store, redirect);
    state.proxy = UpstreamProxy::new(upstream.to_string());
    HttpServer::with_state(config, state)
}
