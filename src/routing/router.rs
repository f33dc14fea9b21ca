//! Route table and fallback dispatch.
//!
//! # Responsibilities
//! - Map (method, path template) to REST handlers
//! - Send GET/HEAD for every other path to the root target
//! - Answer the remaining method/path combinations deterministically
//!
//! # Design Decisions
//! - PUT and POST without a matching route are 400, anything else is 405,
//!   including methods a known path does not serve
//! - A GET on a PUT-only path is root traffic, like any unknown path
//! - The root target is decided per request from the redirect flag

use axum::extract::{FromRequestParts, Request, State};
use axum::extract::ws::WebSocketUpgrade;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::Router;
use tower::ServiceExt;

use crate::http::handlers;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::http::websocket;

/// Build the application routes over `state`.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/bones", get(handlers::list_bones).fallback(unmatched))
        .route(
            "/anatoms/{anatomType}",
            get(handlers::list_structures).fallback(unmatched),
        )
        .route(
            "/anatoms/{anatomType}/{anatomName}",
            get(handlers::get_structure).fallback(unmatched),
        )
        .route("/bodies", get(handlers::list_bodies).fallback(unmatched))
        .route("/body/{bodyName}", get(handlers::get_body).fallback(unmatched))
        .route(
            "/body/{bodyName}/bones",
            put(handlers::update_body_bones).fallback(unmatched),
        )
        .route(
            "/body/{bodyName}/skeleton",
            put(handlers::update_body_skeleton).fallback(unmatched),
        )
        .route(
            "/body/{bodyName}/bone/{boneName}",
            put(handlers::update_body_bone).fallback(unmatched),
        )
        .fallback(unmatched)
        .with_state(state)
}

/// Everything no route claims.
pub async fn unmatched(State(state): State<AppState>, request: Request) -> Response {
    match *request.method() {
        Method::GET | Method::HEAD => root_target(&state, request).await,
        Method::PUT | Method::POST => ApiError::bad_request("bad request").into_response(),
        _ => ApiError::MethodNotAllowed.into_response(),
    }
}

/// Static files when not redirecting and a directory is configured,
/// the dev server otherwise.
async fn root_target(state: &AppState, request: Request) -> Response {
    if let (Some(files), false) = (&state.static_files, state.redirect.is_redirecting()) {
        return match files.clone().oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };
    }

    if websocket::is_upgrade_request(request.headers()) {
        let (mut parts, _body) = request.into_parts();
        return match WebSocketUpgrade::from_request_parts(&mut parts, state).await {
            Ok(upgrade) => {
                websocket::bridge(&state.proxy, upgrade, &parts.uri, &parts.headers)
                    .await
                    .into_response()
            }
            Err(rejection) => rejection.into_response(),
        };
    }

    state.proxy.forward(request).await.into_response()
}
