//! Food requests. Requesters create and cancel them; donors see the
//! requests against their listings and move their status along.

use actix_web::{delete, get, middleware::from_fn, patch, post, web, HttpResponse};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::verify_token;
use crate::errors::ApiError;
use crate::guard::{owned_by_id, owner_filter};
use crate::models::{EmailQuery, Identity, StatusUpdate, DONATOR_EMAIL, REQUESTER_EMAIL};
use crate::store::{documents_to_json, fields_to_document, json_to_document, Collection};
use crate::AppState;

#[get("/requestFood", wrap = "from_fn(verify_token)")]
pub async fn my_requests(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = owner_filter(&identity, query.email.as_deref(), REQUESTER_EMAIL)?;
    let docs = state.store.find(Collection::Requests, filter).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(docs)))
}

#[post("/requestFood", wrap = "from_fn(verify_token)")]
pub async fn create_request(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    if let Some(requester) = body.get(REQUESTER_EMAIL) {
        if requester.as_str() != Some(identity.email.as_str()) {
            return Err(ApiError::Forbidden);
        }
    }

    let doc = json_to_document(&body)?;
    let ack = state.store.insert_one(Collection::Requests, doc).await?;
    info!(id = %ack.inserted_id, email = %identity.email, "food requested");
    Ok(HttpResponse::Ok().json(ack))
}

#[delete("/requestFood/{id}", wrap = "from_fn(verify_token)")]
pub async fn cancel_request(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = owned_by_id(&id, &identity, REQUESTER_EMAIL)?;
    let ack = state.store.delete_one(Collection::Requests, filter).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[get("/manageMyFoodDetail", wrap = "from_fn(verify_token)")]
pub async fn requests_for_my_food(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = owner_filter(&identity, query.email.as_deref(), DONATOR_EMAIL)?;
    let docs = state.store.find(Collection::Requests, filter).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(docs)))
}

#[patch("/myFoodDetail/{id}", wrap = "from_fn(verify_token)")]
pub async fn set_request_status(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    id: web::Path<String>,
    body: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let filter = owned_by_id(&id, &identity, DONATOR_EMAIL)?;
    let fields = body.into_inner().fields();
    if fields.is_empty() {
        return Err(ApiError::BadPayload("foodStatus is required".into()));
    }

    let ack = state
        .store
        .update_fields(Collection::Requests, filter, fields_to_document(fields)?)
        .await?;
    info!(id = %id, matched = ack.matched_count, "request status update");
    Ok(HttpResponse::Ok().json(ack))
}
