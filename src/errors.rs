use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorBody;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no access token")]
    AuthMissing,

    #[error("access token invalid or expired")]
    AuthInvalid,

    #[error("identity does not own the requested scope")]
    Forbidden,

    #[error("malformed document id: {0}")]
    InvalidId(String),

    #[error("malformed payload: {0}")]
    BadPayload(String),

    #[error("payload not storable: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("token lifetime of {0}s overflows the expiry claim")]
    TokenLifetime(i64),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthMissing | ApiError::AuthInvalid => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InvalidId(_) | ApiError::BadPayload(_) | ApiError::Encode(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TokenLifetime(_) | ApiError::Signing(_) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::AuthMissing | ApiError::AuthInvalid => "UnAuthorized".to_string(),
            ApiError::Forbidden => "Forbidden Access".to_string(),
            ApiError::InvalidId(_) | ApiError::BadPayload(_) | ApiError::Encode(_) => {
                self.to_string()
            }
            ApiError::TokenLifetime(_) | ApiError::Signing(_) | ApiError::Store(_) => {
                error!(error = %self, "request failed");
                "Internal Server Error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { message })
    }
}
