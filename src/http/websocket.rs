//! WebSocket proxy handling.
//!
//! # Responsibilities
//! - Detect WebSocket upgrade requests
//! - Establish WebSocket connection to the dev server before answering
//! - Complete upgrade handshake with client
//! - Bidirectional frame forwarding
//!
//! # Data Flow
//! ```text
//! Client ←──── WebSocket frames ────→ Proxy ←──── WebSocket frames ────→ Dev server
//! ```
//!
//! # Design Decisions
//! - The requested subprotocol (Vite uses `vite-hmr`) is forwarded, and the one
//!   the dev server picks is echoed back to the client
//! - Close frames propagated in both directions
//! - Ping/pong forwarded as-is

use axum::extract::ws::{self, WebSocket, WebSocketUpgrade};
use axum::http::header::{self, HeaderMap};
use axum::http::Uri;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame as UpstreamCloseFrame;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::http::proxy::{error_chain, UpstreamProxy};
use crate::http::response::ApiError;
use crate::observability::metrics;

type Upstream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Whether the request asks to switch to the WebSocket protocol.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

/// Connect to the dev server, then upgrade the client and relay frames.
pub async fn bridge(
    proxy: &UpstreamProxy,
    upgrade: WebSocketUpgrade,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = format!("ws://{}{}", proxy.authority(), path_and_query);

    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;
    if let Some(protocols) = headers.get(header::SEC_WEBSOCKET_PROTOCOL) {
        request
            .headers_mut()
            .insert(header::SEC_WEBSOCKET_PROTOCOL, protocols.clone());
    }

    let (upstream, response) = connect_async(request).await.map_err(|e| {
        let message = error_chain(&e);
        tracing::error!(url = %url, error = %message, "Upstream WebSocket error");
        metrics::record_upstream_error();
        ApiError::UpstreamUnavailable(message)
    })?;

    let upgrade = match response
        .headers()
        .get(header::SEC_WEBSOCKET_PROTOCOL)
        .and_then(|v| v.to_str().ok())
    {
        Some(chosen) => upgrade.protocols([chosen.to_owned()]),
        None => upgrade,
    };

    tracing::debug!(url = %url, "WebSocket bridged");
    Ok(upgrade.on_upgrade(move |client| relay(client, upstream)))
}

async fn relay(client: WebSocket, upstream: Upstream) {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    let client_to_upstream = async {
        while let Some(Ok(message)) = client_rx.next().await {
            let closing = matches!(message, ws::Message::Close(_));
            if upstream_tx.send(to_upstream(message)).await.is_err() || closing {
                break;
            }
        }
    };

    let upstream_to_client = async {
        while let Some(Ok(message)) = upstream_rx.next().await {
            let Some(message) = to_client(message) else {
                continue;
            };
            let closing = matches!(message, ws::Message::Close(_));
            if client_tx.send(message).await.is_err() || closing {
                break;
            }
        }
    };

    tokio::select! {
        _ = client_to_upstream => {}
        _ = upstream_to_client => {}
    }
    tracing::debug!("WebSocket bridge closed");
}

fn to_upstream(message: ws::Message) -> UpstreamMessage {
    match message {
        ws::Message::Text(text) => UpstreamMessage::Text(text.as_str().to_owned().into()),
        ws::Message::Binary(data) => UpstreamMessage::Binary(data),
        ws::Message::Ping(data) => UpstreamMessage::Ping(data),
        ws::Message::Pong(data) => UpstreamMessage::Pong(data),
        ws::Message::Close(frame) => UpstreamMessage::Close(frame.map(|f| UpstreamCloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason.as_str().to_owned().into(),
        })),
    }
}

/// Raw frames never surface from a read, so they have no client counterpart.
fn to_client(message: UpstreamMessage) -> Option<ws::Message> {
    Some(match message {
        UpstreamMessage::Text(text) => ws::Message::Text(text.as_str().to_owned().into()),
        UpstreamMessage::Binary(data) => ws::Message::Binary(data),
        UpstreamMessage::Ping(data) => ws::Message::Ping(data),
        UpstreamMessage::Pong(data) => ws::Message::Pong(data),
        UpstreamMessage::Close(frame) => ws::Message::Close(frame.map(|f| ws::CloseFrame {
            code: u16::from(f.code),
            reason: f.reason.as_str().to_owned().into(),
        })),
        UpstreamMessage::Frame(_) => return None,
    })
}
