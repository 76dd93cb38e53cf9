use crate::errors::ApiError;
use crate::models::{Identity, SuccessResponse};
use crate::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};
use tracing::info;

/// Signs the posted identity into a token and hands it back as the
/// `token` cookie.
#[post("/jwt")]
pub async fn issue_token(
    state: web::Data<AppState>,
    payload: web::Json<Identity>,
) -> Result<HttpResponse, ApiError> {
    let identity = payload.into_inner();
    info!(email = %identity.email, "issuing access token");

    let token = state.credentials.issue(identity)?;
    Ok(HttpResponse::Ok()
        .cookie(state.credentials.auth_cookie(token))
        .json(SuccessResponse { success: true }))
}

#[post("/logout")]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(state.credentials.cleared_cookie())
        .json(SuccessResponse { success: true })
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Food Share Hub Server Is Running")
}

/// Health check, reaching through to the store.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state.store.ping().await?;
    Ok(HttpResponse::Ok().body("OK"))
}
