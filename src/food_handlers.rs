//! Listings: the public feed plus the donor's own management views.

use actix_web::{delete, get, middleware::from_fn, patch, post, web, HttpResponse};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::verify_token;
use crate::errors::ApiError;
use crate::guard::{by_id, owned_by_id, owner_filter};
use crate::models::{EmailQuery, Identity, ListingUpdate, DONATOR_EMAIL};
use crate::store::{
    document_to_json, documents_to_json, fields_to_document, json_to_document, Collection,
};
use crate::AppState;

#[get("/foods")]
pub async fn list_foods(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let docs = state
        .store
        .find(Collection::Listings, mongodb::bson::Document::new())
        .await?;
    Ok(HttpResponse::Ok().json(documents_to_json(docs)))
}

#[get("/food/{id}")]
pub async fn get_food(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let doc = state
        .store
        .find_one(Collection::Listings, by_id(&id)?)
        .await?;
    Ok(HttpResponse::Ok().json(doc.map(document_to_json)))
}

#[post("/foods")]
pub async fn create_food(
    state: web::Data<AppState>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let doc = json_to_document(&body)?;
    let ack = state.store.insert_one(Collection::Listings, doc).await?;
    info!(id = %ack.inserted_id, "listing created");
    Ok(HttpResponse::Ok().json(ack))
}

#[get("/manageMyFood", wrap = "from_fn(verify_token)")]
pub async fn my_listings(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = owner_filter(&identity, query.email.as_deref(), DONATOR_EMAIL)?;
    let docs = state.store.find(Collection::Listings, filter).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(docs)))
}

#[delete("/manageMyFood/{id}", wrap = "from_fn(verify_token)")]
pub async fn delete_listing(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = owned_by_id(&id, &identity, DONATOR_EMAIL)?;
    let ack = state.store.delete_one(Collection::Listings, filter).await?;
    info!(id = %id, deleted = ack.deleted_count, "listing delete");
    Ok(HttpResponse::Ok().json(ack))
}

#[get("/update/{id}", wrap = "from_fn(verify_token)")]
pub async fn get_own_listing(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = owned_by_id(&id, &identity, DONATOR_EMAIL)?;
    let doc = state.store.find_one(Collection::Listings, filter).await?;
    Ok(HttpResponse::Ok().json(doc.map(document_to_json)))
}

#[patch("/update/{id}", wrap = "from_fn(verify_token)")]
pub async fn update_listing(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    id: web::Path<String>,
    body: web::Json<ListingUpdate>,
) -> Result<HttpResponse, ApiError> {
    let filter = owned_by_id(&id, &identity, DONATOR_EMAIL)?;
    let fields = body.into_inner().fields();
    if fields.is_empty() {
        return Err(ApiError::BadPayload("no updatable listing fields".into()));
    }

    let ack = state
        .store
        .update_fields(Collection::Listings, filter, fields_to_document(fields)?)
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}
