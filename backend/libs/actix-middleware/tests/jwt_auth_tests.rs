//! Integration tests for the bearer-token gate
//!
//! Covers the middleware in both modes, the `AuthClaims` extractor without
//! middleware, and the uniform 401 body.

use actix_middleware::{AuthClaims, JwtAuthMiddleware};
use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use crypto_core::jwt::{Claims, TokenCodec, DEFAULT_TTL_SECS};
use crypto_core::ManualClock;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TEST_SECRET: &[u8] = b"r8Kq2Lm7Xw4Zp9Nv3Tb6Yc1Hd5Gf0Js_Ae-Ui.Wo~Pa8Rx2Ty7Mk4Vh9Qz3Lb6Nd";

fn codec_at(now: i64) -> (Arc<TokenCodec>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    let codec = TokenCodec::with_clock(TEST_SECRET, DEFAULT_TTL_SECS, clock.clone());
    (Arc::new(codec), clock)
}

fn unauthorized_body() -> Value {
    json!({ "success": false, "status": 401, "message": "Unauthorized" })
}

async fn whoami(claims: AuthClaims, calls: web::Data<AtomicUsize>) -> HttpResponse {
    calls.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!({
        "user_id": claims.user_id(),
        "username": claims.username(),
    }))
}

async fn maybe_whoami(claims: Option<AuthClaims>, calls: web::Data<AtomicUsize>) -> HttpResponse {
    calls.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!({
        "user_id": claims.as_ref().and_then(|c| c.user_id()),
    }))
}

macro_rules! required_app {
    ($codec:expr, $calls:expr) => {
        test::init_service(
            App::new().app_data($calls.clone()).service(
                web::resource("/me")
                    .wrap(JwtAuthMiddleware::required($codec.clone()))
                    .route(web::get().to(whoami)),
            ),
        )
        .await
    };
}

macro_rules! optional_app {
    ($codec:expr, $calls:expr) => {
        test::init_service(
            App::new().app_data($calls.clone()).service(
                web::resource("/feed")
                    .wrap(JwtAuthMiddleware::optional($codec.clone()))
                    .route(web::get().to(maybe_whoami)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_missing_header_is_rejected_before_handler() {
    let (codec, _) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = required_app!(codec, calls);

    let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, unauthorized_body());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_wrong_scheme_is_rejected() {
    let (codec, _) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = required_app!(codec, calls);

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", "Token abc.def.ghi"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_valid_token_reaches_handler() {
    let (codec, _) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = required_app!(codec, calls);
    let token = codec.encode(Claims::for_user(42, "alice")).unwrap();

    for scheme in ["Bearer", "bearer"] {
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("{scheme} {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "user_id": 42, "username": "alice" }));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_expired_and_tampered_tokens_look_like_missing_header() {
    let (codec, clock) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = required_app!(codec, calls);

    let token = codec.encode(Claims::for_user(42, "alice")).unwrap();
    let tampered = format!("{}x", &token[..token.len() - 1]);

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {tampered}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, unauthorized_body());

    clock.set(1000 + DEFAULT_TTL_SECS + 1);
    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, unauthorized_body());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_optional_mode_continues_anonymously() {
    let (codec, _) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = optional_app!(codec, calls);

    let res = test::call_service(&app, test::TestRequest::get().uri("/feed").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "user_id": null }));

    let req = test::TestRequest::get()
        .uri("/feed")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_optional_mode_attaches_claims() {
    let (codec, _) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = optional_app!(codec, calls);
    let token = codec.encode(Claims::for_user(7, "bob")).unwrap();

    let req = test::TestRequest::get()
        .uri("/feed")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "user_id": 7 }));
}

#[actix_web::test]
async fn test_extractor_without_middleware() {
    let (codec, _) = codec_at(1000);
    let calls = web::Data::new(AtomicUsize::new(0));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::from(codec.clone()))
            .app_data(calls.clone())
            .route("/me", web::get().to(whoami)),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, unauthorized_body());

    let token = codec.encode(Claims::for_user(42, "alice")).unwrap();
    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_free_functions() {
    let (codec, _) = codec_at(1000);
    let token = codec.encode(Claims::for_user(42, "alice")).unwrap();

    let req = test::TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_http_request();
    let claims = actix_middleware::require(req.headers(), &codec).unwrap();
    assert_eq!(claims.user_id(), Some(42));

    let anonymous = test::TestRequest::default().to_http_request();
    assert!(actix_middleware::optional(anonymous.headers(), &codec).is_none());
    assert!(actix_middleware::require(anonymous.headers(), &codec).is_err());
}
