//! Reverse proxy to the frontend dev server.
//!
//! # Responsibilities
//! - Rewrite the request URI to `http://localhost:<react_port>`
//! - Forward method, headers and streamed body
//! - Stream the upstream response back unchanged
//! - Turn transport failures into 502 Bad Gateway
//!
//! # Design Decisions
//! - No retries: a dead dev server is reported on every request until restarted
//! - The incoming Host header is kept

use std::error::Error as StdError;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::uri::Scheme;
use axum::http::{Extensions, Request, Uri, Version};
use axum::response::Response;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::security::headers;

/// Forwarder bound to a single upstream origin.
#[derive(Clone)]
pub struct UpstreamProxy {
    client: Client<HttpConnector, Body>,
    authority: String,
}

impl UpstreamProxy {
    /// Proxy to `authority` (`host:port`) over plain HTTP.
    pub fn new(authority: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            authority: authority.into(),
        }
    }

    /// `host:port` of the upstream.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Forward `request` and return the upstream response.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, ApiError> {
        let (mut parts, body) = request.into_parts();

        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        parts.uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.as_str())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;
        parts.version = Version::HTTP_11;
        parts.extensions = Extensions::new();
        headers::strip_hop_by_hop(&mut parts.headers);
        headers::add_forwarded(&mut parts.headers, client_ip);

        tracing::debug!(method = %parts.method, uri = %parts.uri, "Proxying request");

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                headers::strip_hop_by_hop(&mut parts.headers);
                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Err(e) => {
                let message = error_chain(&e);
                tracing::error!(upstream = %self.authority, error = %message, "Upstream error");
                metrics::record_upstream_error();
                Err(ApiError::UpstreamUnavailable(message))
            }
        }
    }
}

/// `outer: inner: root`, so the client sees why the connection failed.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
