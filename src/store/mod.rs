//! Document store seam.
//!
//! Handlers never talk to a driver directly. They build a BSON filter, pick a
//! [`Collection`] and call one [`DocumentStore`] operation; the result is
//! handed back to the client almost unchanged.

use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Listings,
    Requests,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Listings => "foods",
            Collection::Requests => "foodRequest",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Opaque CRUD over the two collections.
///
/// Filters are plain equality documents. `update_fields` has `$set`
/// semantics: only the given keys change. Matching nothing is not an error;
/// it shows up as zero counts in the acknowledgment.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: Document)
        -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn insert_one(&self, collection: Collection, doc: Document)
        -> Result<InsertAck, StoreError>;

    async fn update_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, StoreError>;

    async fn delete_one(&self, collection: Collection, filter: Document)
        -> Result<DeleteAck, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Renders an identifier the way the browser client expects: ObjectIds as
/// bare hex strings, anything else as relaxed extended JSON.
pub fn id_to_json(id: Bson) -> Value {
    match id {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

/// Converts a stored document into the JSON sent back to the client.
pub fn document_to_json(mut doc: Document) -> Value {
    if let Ok(oid) = doc.get_object_id("_id") {
        doc.insert("_id", oid.to_hex());
    }
    Bson::Document(doc).into_relaxed_extjson()
}

pub fn documents_to_json(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter().map(document_to_json).collect()
}

/// Converts a client JSON object into BSON for storage.
pub fn json_to_document(map: &Map<String, Value>) -> Result<Document, bson::ser::Error> {
    bson::to_document(map)
}

/// Builds the `$set` body for a whitelisted update.
pub fn fields_to_document(fields: Vec<(&str, Value)>) -> Result<Document, bson::ser::Error> {
    let mut doc = Document::new();
    for (name, value) in fields {
        doc.insert(name, bson::to_bson(&value)?);
    }
    Ok(doc)
}

pub fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}
