use crate::errors::ApiError;
use crate::models::{Claims, Identity};
use crate::AppState;
use actix_web::{
    body::{EitherBody, MessageBody},
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

pub const TOKEN_COOKIE: &str = "token";

/// Claims the issuer owns; a login payload cannot smuggle its own.
const RESERVED_CLAIMS: [&str; 3] = ["iat", "exp", "nbf"];

/// Signs and checks access tokens with one server-held HMAC secret.
#[derive(Clone)]
pub struct Credentials {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl Credentials {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        // Expiry is checked by `verify_at` against an explicit clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, identity: Identity) -> Result<String, ApiError> {
        self.issue_at(identity, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, mut identity: Identity, now: i64) -> Result<String, ApiError> {
        for claim in RESERVED_CLAIMS {
            identity.extra.remove(claim);
        }

        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or(ApiError::TokenLifetime(self.ttl_secs))?;
        let claims = Claims {
            identity,
            iat: now,
            exp,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Accepts `token` while `now <= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "rejecting access token");
            ApiError::AuthInvalid
        })?;

        if now > data.claims.exp {
            debug!(exp = data.claims.exp, now, "rejecting expired access token");
            return Err(ApiError::AuthInvalid);
        }

        Ok(data.claims.identity)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, ApiError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    pub fn auth_cookie(&self, token: String) -> Cookie<'static> {
        session_cookie(token, CookieDuration::seconds(self.ttl_secs))
    }

    pub fn cleared_cookie(&self) -> Cookie<'static> {
        session_cookie(String::new(), CookieDuration::ZERO)
    }
}

fn session_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(max_age)
        .finish()
}

/// Gate for protected resources: the `token` cookie must carry a valid
/// token, whose identity is then placed in the request extensions.
/// Rejections are answered here and never reach the handler.
pub async fn verify_token(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    let identity = match authenticate(&req) {
        Ok(identity) => identity,
        Err(err) => {
            debug!(path = req.path(), error = %err, "rejecting request");
            return Ok(req.error_response(err).map_into_right_body());
        }
    };

    debug!(email = %identity.email, path = req.path(), "access token accepted");
    req.extensions_mut().insert(identity);

    Ok(next.call(req).await?.map_into_left_body())
}

fn authenticate(req: &ServiceRequest) -> Result<Identity, Error> {
    let token = req
        .cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::AuthMissing)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("app state not configured"))?;

    Ok(state.credentials.verify(&token)?)
}
