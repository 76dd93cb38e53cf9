use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::Mutex;

use super::{
    id_to_json, Collection, DeleteAck, DocumentStore, InsertAck, StoreError, UpdateAck,
};

type Collections = Arc<Mutex<HashMap<Collection, Vec<Document>>>>;

/// Process-local store used by tests and `STORE_BACKEND=memory`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, want)| doc.get(key) == Some(want))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<InsertAck, StoreError> {
        let id = doc
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

        // `_id` goes first, as the server would store it.
        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in doc {
            if key != "_id" {
                stored.insert(key, value);
            }
        }

        self.collections
            .lock()
            .await
            .entry(collection)
            .or_default()
            .push(stored);

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id_to_json(id),
        })
    }

    async fn update_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, StoreError> {
        let mut collections = self.collections.lock().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| matches(d, &filter)));

        let (matched_count, modified_count) = match target {
            Some(doc) => {
                let mut changed = false;
                for (key, value) in fields {
                    if doc.get(&key) != Some(&value) {
                        doc.insert(key, value);
                        changed = true;
                    }
                }
                (1, u64::from(changed))
            }
            None => (0, 0),
        };

        Ok(UpdateAck {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        })
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteAck, StoreError> {
        let mut collections = self.collections.lock().await;
        let deleted_count = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|d| matches(d, &filter)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
