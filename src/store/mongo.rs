//! MongoDB-backed store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Client, Collection, Database};
use serde_json::Value;

use crate::store::breadcrumb::{Breadcrumb, BONES_FIELD};
use crate::store::document::{to_bson, to_json};
use crate::store::error::{StoreError, StoreResult};
use crate::store::{
    BodyStore, Document, BODIES_COLLECTION, BODY_NAME_FIELD, BODY_SUMMARY_FIELDS,
    STRUCTURES_COLLECTION, STRUCTURE_SUMMARY_FIELDS,
};

/// Store over a pooled MongoDB client. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect and ping the database so a bad URI fails at startup.
    pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = %db_name, "Connected to MongoDB");

        Ok(Self { client, db })
    }

    fn structures(&self) -> Collection<bson::Document> {
        self.db.collection(STRUCTURES_COLLECTION)
    }

    fn bodies(&self) -> Collection<bson::Document> {
        self.db.collection(BODIES_COLLECTION)
    }

    async fn set_field(&self, name: &str, field: String, value: &Value) -> StoreResult<()> {
        let mut set = bson::Document::new();
        set.insert(field, to_bson(value)?);

        let result = self
            .bodies()
            .update_one(name_filter(name), doc! { "$set": set })
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::not_found(name));
        }
        if result.modified_count == 0 {
            tracing::debug!(body = %name, "Update matched but left the document unchanged");
        }
        Ok(())
    }
}

fn projection(fields: &[&str]) -> bson::Document {
    let mut projection = bson::Document::new();
    for field in fields {
        projection.insert(*field, 1);
    }
    projection
}

fn name_filter(name: &str) -> bson::Document {
    let mut filter = bson::Document::new();
    filter.insert(BODY_NAME_FIELD, name);
    filter
}

#[async_trait]
impl BodyStore for MongoStore {
    async fn list_bones(&self) -> StoreResult<Vec<Document>> {
        let cursor = self.structures().find(doc! { "type": "bone" }).await?;
        let docs: Vec<bson::Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(to_json).collect())
    }

    async fn list_structures(&self, kind: &str) -> StoreResult<Vec<Document>> {
        let cursor = self
            .structures()
            .find(doc! { "type": kind })
            .projection(projection(&STRUCTURE_SUMMARY_FIELDS))
            .await?;
        let docs: Vec<bson::Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(to_json).collect())
    }

    async fn get_structure(&self, kind: &str, name: &str) -> StoreResult<Document> {
        self.structures()
            .find_one(doc! { "type": kind, "name": name })
            .await?
            .map(to_json)
            .ok_or_else(|| StoreError::StructureNotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    async fn list_bodies(&self) -> StoreResult<Vec<Document>> {
        let cursor = self
            .bodies()
            .find(doc! {})
            .projection(projection(&BODY_SUMMARY_FIELDS))
            .await?;
        let docs: Vec<bson::Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(to_json).collect())
    }

    async fn get_body(&self, name: &str) -> StoreResult<Document> {
        self.bodies()
            .find_one(name_filter(name))
            .await?
            .map(to_json)
            .ok_or_else(|| StoreError::not_found(name))
    }

    async fn update_body_skeleton(&self, name: &str, skeleton: Value) -> StoreResult<()> {
        self.set_field(name, "skeleton".to_string(), &skeleton).await
    }

    async fn update_body_bones(&self, name: &str, bones: Value) -> StoreResult<()> {
        self.set_field(name, BONES_FIELD.to_string(), &bones).await
    }

    async fn update_body_bone(
        &self,
        name: &str,
        breadcrumb: &Breadcrumb,
        value: Value,
    ) -> StoreResult<()> {
        self.set_field(name, breadcrumb.field_path(), &value).await
    }

    async fn close(&self) -> StoreResult<()> {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB connection closed");
        Ok(())
    }
}
