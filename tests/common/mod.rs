#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_web::{cookie::Cookie, web};
use async_trait::async_trait;
use food_share_hub::{
    auth::{Credentials, TOKEN_COOKIE},
    models::Identity,
    store::{
        Collection, DeleteAck, DocumentStore, InsertAck, MemoryStore, StoreError, UpdateAck,
    },
    AppState,
};
use mongodb::bson::Document;

pub const SECRET: &str = "integration-secret";

pub fn credentials() -> Credentials {
    Credentials::new(SECRET, 3600)
}

pub fn state(store: Arc<dyn DocumentStore>) -> web::Data<AppState> {
    web::Data::new(AppState::new(store, credentials()))
}

pub fn token_cookie(email: &str) -> Cookie<'static> {
    let token = credentials().issue(Identity::new(email)).unwrap();
    Cookie::new(TOKEN_COOKIE, token)
}

/// Memory store that counts every call made through it.
#[derive(Default)]
pub struct SpyStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl SpyStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for SpyStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        self.hit();
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.hit();
        self.inner.find_one(collection, filter).await
    }

    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<InsertAck, StoreError> {
        self.hit();
        self.inner.insert_one(collection, doc).await
    }

    async fn update_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, StoreError> {
        self.hit();
        self.inner.update_fields(collection, filter, fields).await
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteAck, StoreError> {
        self.hit();
        self.inner.delete_one(collection, filter).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.hit();
        self.inner.ping().await
    }
}

/// Store whose every operation fails as if the deployment were unreachable.
#[derive(Default)]
pub struct FailingStore;

fn unreachable_store() -> StoreError {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store unreachable");
    StoreError::Mongo(io.into())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find(&self, _: Collection, _: Document) -> Result<Vec<Document>, StoreError> {
        Err(unreachable_store())
    }

    async fn find_one(&self, _: Collection, _: Document) -> Result<Option<Document>, StoreError> {
        Err(unreachable_store())
    }

    async fn insert_one(&self, _: Collection, _: Document) -> Result<InsertAck, StoreError> {
        Err(unreachable_store())
    }

    async fn update_fields(
        &self,
        _: Collection,
        _: Document,
        _: Document,
    ) -> Result<UpdateAck, StoreError> {
        Err(unreachable_store())
    }

    async fn delete_one(&self, _: Collection, _: Document) -> Result<DeleteAck, StoreError> {
        Err(unreachable_store())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable_store())
    }
}
