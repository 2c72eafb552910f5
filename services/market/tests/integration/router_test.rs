//! HTTP surface tests. The state carries a disconnected database, so every
//! case here is decided before any query runs.

use axum::http::{HeaderName, HeaderValue, StatusCode, header::COOKIE};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use bazaar_domain::user::UserRole;
use bazaar_market::domain::types::RateLimit;
use bazaar_market::infra::rate_limit::{InMemoryRateLimiter, RateLimiterBackend};
use bazaar_market::infra::sms::{LogSmsSender, SmsGateway};
use bazaar_market::router::build_router;
use bazaar_market::state::AppState;
use bazaar_testing::auth::{MockSession, TEST_JWT_SECRET};

fn test_server() -> TestServer {
    let limit = RateLimit {
        max: 10,
        window_secs: 60,
    };
    let state = AppState {
        db: DatabaseConnection::default(),
        sms: SmsGateway::Log(LogSmsSender),
        rate_limiter: RateLimiterBackend::InMemory(InMemoryRateLimiter::new()),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_domain: "localhost".to_owned(),
        otp_rate_limit: limit,
        chat_rate_limit: limit,
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_and_fail_readiness_without_database() {
    let server = test_server();

    let live = server.get("/healthz").await;
    assert_eq!(live.status_code(), StatusCode::OK);
    assert!(live.headers().contains_key("x-request-id"));

    let ready = server.get("/readyz").await;
    assert_eq!(ready.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_invalid_phone_on_otp_request() {
    let server = test_server();

    let resp = server
        .post("/auth/otp")
        .json(&json!({ "phone": "12345" }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_PHONE");
}

#[tokio::test]
async fn should_require_phone_on_otp_request() {
    let server = test_server();

    let resp = server.post("/auth/otp").json(&json!({})).await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(body["error"], "phone is required");
}

#[tokio::test]
async fn should_render_malformed_body_as_error_envelope() {
    let server = test_server();

    let resp = server.post("/auth/otp/verify").text("not json").await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"], "invalid request body");
}

#[tokio::test]
async fn should_require_phone_and_code_on_verify() {
    let server = test_server();

    let resp = server
        .post("/auth/otp/verify")
        .json(&json!({ "phone": "+911234567890" }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"], "phone and code are required");
}

#[tokio::test]
async fn should_reject_protected_routes_without_session() {
    let server = test_server();

    for path in ["/users/@me", "/chats", "/tickets", "/admin/users", "/admin/reports"] {
        let resp = server.get(path).await;
        assert_eq!(
            resp.status_code(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {path}"
        );
        let body: Value = resp.json();
        assert_eq!(body["kind"], "UNAUTHENTICATED");
    }

    let resp = server.delete("/auth/session").await;
    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_token_signed_with_another_secret() {
    let server = test_server();
    let forged = MockSession::new(Uuid::new_v4(), UserRole::Admin).with_secret("not-the-secret");

    let resp = server
        .get("/admin/users")
        .add_header(COOKIE, forged.cookie_header())
        .await;
    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);

    let resp = server
        .get("/users/@me")
        .add_header(
            HeaderName::from_static("authorization"),
            forged.bearer_header(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_garbage_session_cookie() {
    let server = test_server();

    let resp = server
        .post("/products")
        .add_header(COOKIE, HeaderValue::from_static("bazaar_session=garbage"))
        .json(&json!({ "title": "Bike", "priceCents": 100 }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_malformed_listing_id() {
    let server = test_server();

    let resp = server.get("/products/not-a-uuid").await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
}
