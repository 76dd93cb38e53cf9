//! Token issuance and the verification gate in front of protected routes.

mod common;

use std::sync::Arc;

use actix_web::{
    cookie::{Cookie, SameSite},
    http::{Method, StatusCode},
    test, App,
};
use food_share_hub::{auth::Credentials, models::Identity, routes, store::MemoryStore};
use serde_json::{json, Value};

use common::{state, token_cookie};

const GATED: [(&str, &str); 10] = [
    ("GET", "/requestFood?email=a@x.com"),
    ("POST", "/requestFood"),
    ("DELETE", "/requestFood/65a1f0c2e4b0a1b2c3d4e5f6"),
    ("GET", "/manageMyFood?email=a@x.com"),
    ("GET", "/manageMyFoodDetail?email=a@x.com"),
    ("PATCH", "/myFoodDetail/65a1f0c2e4b0a1b2c3d4e5f6"),
    ("DELETE", "/manageMyFood/65a1f0c2e4b0a1b2c3d4e5f6"),
    ("GET", "/update/65a1f0c2e4b0a1b2c3d4e5f6"),
    ("PATCH", "/update/65a1f0c2e4b0a1b2c3d4e5f6"),
    ("GET", "/manageMyFood"),
];

fn gated_request(method: &str, uri: &str) -> test::TestRequest {
    test::TestRequest::default()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri)
        .set_json(json!({"foodStatus": "Delivered"}))
}

#[actix_web::test]
async fn jwt_sets_http_only_cookie() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({"email": "a@x.com", "name": "Ana"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "token")
        .map(Cookie::into_owned)
        .expect("token cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::None));
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::hours(1))
    );

    let identity = common::credentials().verify(cookie.value()).unwrap();
    assert_eq!(identity.email, "a@x.com");
    assert_eq!(identity.extra.get("name"), Some(&json!("Ana")));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": true}));
}

#[actix_web::test]
async fn jwt_requires_an_email() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({"name": "nobody"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_cookie_is_unauthorized_everywhere() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    for (method, uri) in GATED {
        let resp = test::call_service(&app, gated_request(method, uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "UnAuthorized"}));
    }
}

#[actix_web::test]
async fn forged_and_expired_tokens_are_unauthorized() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    let forged = Credentials::new("someone-else", 3600)
        .issue(Identity::new("a@x.com"))
        .unwrap();
    let expired = common::credentials()
        .issue_at(Identity::new("a@x.com"), chrono::Utc::now().timestamp() - 7200)
        .unwrap();

    for token in [forged, expired, "garbage".to_string()] {
        for (method, uri) in GATED {
            let req = gated_request(method, uri)
                .cookie(Cookie::new("token", token.clone()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }
}

#[actix_web::test]
async fn valid_cookie_passes_the_gate() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/manageMyFood?email=a@x.com")
        .cookie(token_cookie("a@x.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn public_routes_need_no_cookie() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    for uri in ["/", "/foods", "/food/65a1f0c2e4b0a1b2c3d4e5f6", "/health"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn logout_expires_the_cookie() {
    let app = test::init_service(
        App::new()
            .app_data(state(Arc::new(MemoryStore::new())))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(token_cookie("a@x.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "token")
        .map(Cookie::into_owned)
        .expect("token cookie");
    assert_eq!(cookie.value(), "");
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );
}
