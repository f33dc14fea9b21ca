//! REST handlers over the body store.

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::http::extract::{require_param, JsonBody};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::store::document::ensure_representable;
use crate::store::{Breadcrumb, Document, StoreError};

/// Body of `PUT /body/{bodyName}/bone/{boneName}`.
#[derive(Debug, Deserialize)]
pub struct BoneUpdate {
    /// New value for the addressed field.
    #[serde(alias = "payload")]
    pub bone: Value,

    /// Path below the bone, e.g. `["count"]`.
    #[serde(default)]
    pub breadcrumb: Vec<String>,
}

fn db_error(uri: &Uri, err: StoreError) -> ApiError {
    tracing::error!(uri = %uri, error = %err, "db error");
    ApiError::Store(err)
}

pub async fn list_bones(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<Document>>, ApiError> {
    let bones = state.store.list_bones().await.map_err(|e| db_error(&uri, e))?;
    Ok(Json(bones))
}

/// Structures of one type, summarised.
pub async fn list_structures(
    State(state): State<AppState>,
    uri: Uri,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let kind = require_param(&kind, "structure type")?;

    let structures = state
        .store
        .list_structures(kind)
        .await
        .map_err(|e| db_error(&uri, e))?;
    Ok(Json(structures))
}

pub async fn get_structure(
    State(state): State<AppState>,
    uri: Uri,
    Path((kind, name)): Path<(String, String)>,
) -> Result<Json<Document>, ApiError> {
    let kind = require_param(&kind, "structure type")?;
    let name = require_param(&name, "structure name")?;

    let structure = state
        .store
        .get_structure(kind, name)
        .await
        .map_err(|e| db_error(&uri, e))?;
    Ok(Json(structure))
}

pub async fn list_bodies(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<Document>>, ApiError> {
    let bodies = state.store.list_bodies().await.map_err(|e| db_error(&uri, e))?;
    Ok(Json(bodies))
}

pub async fn get_body(
    State(state): State<AppState>,
    uri: Uri,
    Path(body_name): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let name = require_param(&body_name, "body name")?;

    let body = state.store.get_body(name).await.map_err(|e| db_error(&uri, e))?;
    Ok(Json(body))
}

pub async fn update_body_bones(
    State(state): State<AppState>,
    uri: Uri,
    Path(body_name): Path<String>,
    JsonBody(bones): JsonBody<Document>,
) -> Result<StatusCode, ApiError> {
    let name = require_param(&body_name, "body name")?;
    let bones = Value::Object(bones);
    ensure_representable(&bones)?;

    state
        .store
        .update_body_bones(name, bones)
        .await
        .map_err(|e| db_error(&uri, e))?;
    Ok(StatusCode::OK)
}

pub async fn update_body_skeleton(
    State(state): State<AppState>,
    uri: Uri,
    Path(body_name): Path<String>,
    JsonBody(skeleton): JsonBody<Document>,
) -> Result<StatusCode, ApiError> {
    let name = require_param(&body_name, "body name")?;
    let skeleton = Value::Object(skeleton);
    ensure_representable(&skeleton)?;

    state
        .store
        .update_body_skeleton(name, skeleton)
        .await
        .map_err(|e| db_error(&uri, e))?;
    Ok(StatusCode::OK)
}

/// Set one field inside a bone; the bone name is the breadcrumb's first segment.
pub async fn update_body_bone(
    State(state): State<AppState>,
    uri: Uri,
    Path((body_name, bone_name)): Path<(String, String)>,
    JsonBody(update): JsonBody<BoneUpdate>,
) -> Result<StatusCode, ApiError> {
    let name = require_param(&body_name, "body name")?;
    let bone = require_param(&bone_name, "bone name")?;

    let breadcrumb = Breadcrumb::new(std::iter::once(bone.to_string()).chain(update.breadcrumb))
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    ensure_representable(&update.bone)?;

    state
        .store
        .update_body_bone(name, &breadcrumb, update.bone)
        .await
        .map_err(|e| db_error(&uri, e))?;

    tracing::debug!(body = %name, path = %breadcrumb.field_path(), "Bone updated");
    Ok(StatusCode::OK)
}
