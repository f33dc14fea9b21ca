//! Route behaviour driven through the fully layered router.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use anatom_server::http::X_REQUEST_ID;
use anatom_server::store::{BodyStore, MemoryStore, StoreError};
use anatom_server::RedirectFlag;
use common::{seeded_store, server, start_mock_upstream, unused_addr};

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn bones_lists_only_bone_structures() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/bones")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("application/json"));

    let bones: Vec<Value> = serde_json::from_str(&body_text(response).await).unwrap();
    let names: Vec<&str> = bones.iter().map(|b| b["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["femur", "ulna"]);
}

#[tokio::test]
async fn bodies_lists_summaries() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/bodies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bodies: Vec<Value> = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["generals"]["name"], "torso");
    assert!(bodies[0].get("bones").is_none());
    assert!(bodies[0].get("skeleton").is_none());
}

#[tokio::test]
async fn bone_update_then_read_back() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    let response = app
        .clone()
        .oneshot(put_json(
            "/body/torso/bone/ribs",
            json!({ "bone": 26, "breadcrumb": ["count"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/body/torso")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["bones"]["ribs"]["count"], 26);
    assert_eq!(body["bones"]["spine"]["count"], 33);
    assert_eq!(body["skeleton"]["visible"], true);
}

#[tokio::test]
async fn skeleton_and_bones_replace_whole_fields() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    let response = app
        .clone()
        .oneshot(put_json("/body/torso/skeleton", json!({ "visible": false })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(put_json("/body/torso/bones", json!({ "skull": { "count": 22 } })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = store.get_body("torso").await.unwrap();
    assert_eq!(body["skeleton"], json!({ "visible": false }));
    assert_eq!(body["bones"], json!({ "skull": { "count": 22 } }));
}

#[tokio::test]
async fn non_json_content_type_is_rejected_before_the_store() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    for uri in ["/body/x/bones", "/body/torso/bones", "/body/torso/skeleton"] {
        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(r#"{"visible":false}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, "you must provide a JSON document");
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/body/torso/bones")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn dotted_breadcrumb_segment_is_rejected() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    let response = app
        .oneshot(put_json(
            "/body/torso/bone/ribs",
            json!({ "bone": 1, "breadcrumb": ["a.b"] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn structures_are_listed_by_type() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/anatoms/bone")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bones: Vec<Value> = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        bones,
        vec![
            json!({ "_id": "1", "type": "bone", "name": "femur" }),
            json!({ "_id": "3", "type": "bone", "name": "ulna" }),
        ]
    );
}

#[tokio::test]
async fn structure_is_fetched_by_type_and_name() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.clone().oneshot(get("/anatoms/muscle/biceps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let muscle: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(muscle["name"], "biceps");

    let response = app.oneshot(get("/anatoms/bone/biceps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_integer_in_update_is_a_bad_request() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/body/torso/bone/ribs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"bone": 18446744073709551615, "breadcrumb": ["count"]}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn missing_body_is_a_server_error() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/body/pelvis")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
    let upstream = unused_addr().await;
    let store = std::sync::Arc::new(
        MemoryStore::new().with_failure(StoreError::Backend("connection refused".into())),
    );
    let app = server(store, upstream, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/bones")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unmatched_methods_are_answered_deterministically() {
    let upstream = unused_addr().await;
    let store = seeded_store();
    let app = server(store.clone(), upstream, None, RedirectFlag::new(true)).router();

    let cases = [
        (Method::PUT, "/unknown", StatusCode::BAD_REQUEST),
        (Method::POST, "/anything", StatusCode::BAD_REQUEST),
        (Method::POST, "/bones", StatusCode::BAD_REQUEST),
        (Method::PUT, "/bones", StatusCode::BAD_REQUEST),
        (Method::DELETE, "/bones", StatusCode::METHOD_NOT_ALLOWED),
        (Method::DELETE, "/body/torso", StatusCode::METHOD_NOT_ALLOWED),
        (Method::PATCH, "/unknown", StatusCode::METHOD_NOT_ALLOWED),
    ];

    for (method, uri, expected) in cases {
        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), expected, "{method} {uri}");
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn redirect_proxies_even_with_static_dir() {
    let upstream = start_mock_upstream("from dev server").await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "from disk").unwrap();

    let app = server(
        seeded_store(),
        upstream.addr,
        Some(dir.path()),
        RedirectFlag::new(true),
    )
    .router();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "from dev server");
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn static_mode_never_contacts_upstream() {
    let upstream = start_mock_upstream("from dev server").await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "from disk").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

    let app = server(
        seeded_store(),
        upstream.addr,
        Some(dir.path()),
        RedirectFlag::new(false),
    )
    .router();

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "from disk");

    let response = app.clone().oneshot(get("/app.js")).await.unwrap();
    assert_eq!(body_text(response).await, "console.log(1)");

    let response = app.oneshot(get("/missing.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn no_static_dir_always_proxies() {
    let upstream = start_mock_upstream("from dev server").await;
    let app = server(seeded_store(), upstream.addr, None, RedirectFlag::new(false)).router();

    let response = app.oneshot(get("/src/main.tsx")).await.unwrap();
    assert_eq!(body_text(response).await, "from dev server");
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn flipping_the_flag_switches_the_next_request() {
    let upstream = start_mock_upstream("from dev server").await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "from disk").unwrap();

    let flag = RedirectFlag::new(false);
    let app = server(seeded_store(), upstream.addr, Some(dir.path()), flag.clone()).router();

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(body_text(response).await, "from disk");

    flag.set(true);
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(body_text(response).await, "from dev server");
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn get_on_update_route_goes_to_root_target() {
    let upstream = start_mock_upstream("from dev server").await;
    let app = server(seeded_store(), upstream.addr, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/body/torso/skeleton")).await.unwrap();
    assert_eq!(body_text(response).await, "from dev server");
}

#[tokio::test]
async fn upstream_down_is_bad_gateway() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(!body_text(response).await.is_empty());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let upstream = unused_addr().await;
    let app = server(seeded_store(), upstream, None, RedirectFlag::new(true)).router();

    let response = app.clone().oneshot(get("/bones")).await.unwrap();
    assert!(response.headers().contains_key(X_REQUEST_ID));

    let request = Request::builder()
        .uri("/bones")
        .header(X_REQUEST_ID, "caller-id-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[X_REQUEST_ID], "caller-id-42");
}
