//! Backend for the Food Share Hub: food listings and the requests made
//! against them, gated by a cookie-carried access token.

use std::sync::Arc;

use actix_web::web;

pub mod auth;
pub mod config;
pub mod errors;
pub mod food_handlers;
pub mod guard;
pub mod models;
pub mod request_handlers;
pub mod store;
pub mod user_handlers;

use auth::Credentials;
use errors::ApiError;
use store::DocumentStore;

/// Process-wide state, built once at startup and shared by every worker.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub credentials: Credentials,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, credentials: Credentials) -> Self {
        Self { store, credentials }
    }
}

/// Registers every route and the extractor error handlers.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadPayload(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadPayload(err.to_string()).into()),
    )
    .service(user_handlers::index)
    .service(user_handlers::health)
    .service(user_handlers::issue_token)
    .service(user_handlers::logout)
    .service(food_handlers::list_foods)
    .service(food_handlers::get_food)
    .service(food_handlers::create_food)
    .service(food_handlers::my_listings)
    .service(food_handlers::delete_listing)
    .service(food_handlers::get_own_listing)
    .service(food_handlers::update_listing)
    .service(request_handlers::my_requests)
    .service(request_handlers::create_request)
    .service(request_handlers::cancel_request)
    .service(request_handlers::requests_for_my_food)
    .service(request_handlers::set_request_status);
}
