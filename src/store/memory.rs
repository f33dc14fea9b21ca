//! In-process store with the same update semantics as the MongoDB adapter.
//!
//! Used by the test suites and handy for running the server without a
//! database. Every trait call is counted, so callers can assert that input
//! validation rejected a request before the store was touched.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::store::breadcrumb::{Breadcrumb, BONES_FIELD};
use crate::store::error::{StoreError, StoreResult};
use crate::store::{BodyStore, Document, BODY_SUMMARY_FIELDS, STRUCTURE_SUMMARY_FIELDS};

#[derive(Debug, Default)]
pub struct MemoryStore {
    structures: RwLock<Vec<Document>>,
    bodies: RwLock<Vec<Document>>,
    failure: Option<StoreError>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the structures collection.
    pub fn with_structures(mut self, structures: Vec<Document>) -> Self {
        self.structures = RwLock::new(structures);
        self
    }

    /// Seed the bodies collection.
    pub fn with_bodies(mut self, bodies: Vec<Document>) -> Self {
        self.bodies = RwLock::new(bodies);
        self
    }

    /// Make every operation fail with `error`.
    pub fn with_failure(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of trait operations invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn set_field(&self, name: &str, path: &[&str], value: Value) -> StoreResult<()> {
        let mut bodies = self.bodies.write().await;
        let body = bodies
            .iter_mut()
            .find(|body| body_name(body) == Some(name))
            .ok_or_else(|| StoreError::not_found(name))?;

        set_path(body, path, value)
    }
}

fn project(doc: &Document, fields: &[&str]) -> Document {
    doc.iter()
        .filter(|(key, _)| fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn field<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

fn body_name(body: &Document) -> Option<&str> {
    body.get("generals")?.get("name")?.as_str()
}

/// `$set` semantics: missing intermediate objects are created, a scalar in
/// the way is an error, numeric segments index into existing arrays.
fn set_path(root: &mut Document, path: &[&str], value: Value) -> StoreResult<()> {
    let invalid = || StoreError::InvalidPath(path.join("."));

    let Some((last, parents)) = path.split_last() else {
        return Err(invalid());
    };
    let Some((first, rest)) = parents.split_first() else {
        root.insert((*last).to_string(), value);
        return Ok(());
    };

    let mut current = root
        .entry((*first).to_string())
        .or_insert_with(|| Value::Object(Document::new()));

    for segment in rest {
        current = match current {
            Value::Object(map) => map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Document::new())),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
    }

    match current {
        Value::Object(map) => {
            map.insert((*last).to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = last
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(invalid)?;
            *slot = value;
            Ok(())
        }
        _ => Err(invalid()),
    }
}

#[async_trait]
impl BodyStore for MemoryStore {
    async fn list_bones(&self) -> StoreResult<Vec<Document>> {
        self.enter()?;
        let structures = self.structures.read().await;
        Ok(structures
            .iter()
            .filter(|doc| field(doc, "type") == Some("bone"))
            .cloned()
            .collect())
    }

    async fn list_structures(&self, kind: &str) -> StoreResult<Vec<Document>> {
        self.enter()?;
        let structures = self.structures.read().await;
        Ok(structures
            .iter()
            .filter(|doc| field(doc, "type") == Some(kind))
            .map(|doc| project(doc, &STRUCTURE_SUMMARY_FIELDS))
            .collect())
    }

    async fn get_structure(&self, kind: &str, name: &str) -> StoreResult<Document> {
        self.enter()?;
        let structures = self.structures.read().await;
        structures
            .iter()
            .find(|doc| field(doc, "type") == Some(kind) && field(doc, "name") == Some(name))
            .cloned()
            .ok_or_else(|| StoreError::StructureNotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    async fn list_bodies(&self) -> StoreResult<Vec<Document>> {
        self.enter()?;
        let bodies = self.bodies.read().await;
        Ok(bodies
            .iter()
            .map(|body| project(body, &BODY_SUMMARY_FIELDS))
            .collect())
    }

    async fn get_body(&self, name: &str) -> StoreResult<Document> {
        self.enter()?;
        let bodies = self.bodies.read().await;
        bodies
            .iter()
            .find(|body| body_name(body) == Some(name))
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))
    }

    async fn update_body_skeleton(&self, name: &str, skeleton: Value) -> StoreResult<()> {
        self.enter()?;
        self.set_field(name, &["skeleton"], skeleton).await
    }

    async fn update_body_bones(&self, name: &str, bones: Value) -> StoreResult<()> {
        self.enter()?;
        self.set_field(name, &[BONES_FIELD], bones).await
    }

    async fn update_body_bone(
        &self,
        name: &str,
        breadcrumb: &Breadcrumb,
        value: Value,
    ) -> StoreResult<()> {
        self.enter()?;
        let path: Vec<&str> = std::iter::once(BONES_FIELD)
            .chain(breadcrumb.segments().iter().map(String::as_str))
            .collect();
        self.set_field(name, &path, value).await
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
