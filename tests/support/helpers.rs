// tests/support/helpers.rs
use super::mocks::{self, ManualClock};
use authgate::application::{
    ports::{
        authorization_code::AuthorizationCodeStore, ticket_store::TicketStore,
        token_store::TokenStore,
    },
    services::{ApplicationServices, ServicePolicy},
};
use authgate::domain::oauth::pkce::s256_challenge;
use authgate::infrastructure::security::{
    authorization_code_store::InMemoryAuthorizationCodeStore,
    client_registry::InMemoryClientRegistry, random::OsRngSecretGenerator,
    ticket_store::InMemoryTicketStore, token::BiscuitAccessTokenIssuer,
    token_store::InMemoryTokenStore,
};
use authgate::presentation::http::{
    routes::{RouterOptions, build_router},
    state::HttpState,
};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt as _;

/// RFC 7636 appendix B verifier.
pub const VERIFIER: &str = "dBjftJeZ4CVP-mJ0kq7vvcf4ejR7uVq7eNW5K-2YkXw";

pub fn test_policy() -> ServicePolicy {
    ServicePolicy {
        ticket_ttl: chrono::Duration::seconds(600),
        code_ttl: chrono::Duration::seconds(60),
        access_token_ttl: chrono::Duration::seconds(3600),
        refresh_token_ttl: chrono::Duration::days(30),
        allow_plain_pkce: true,
    }
}

pub fn build_services_with_stores(
    clock: &ManualClock,
    tickets: Arc<dyn TicketStore>,
    codes: Arc<dyn AuthorizationCodeStore>,
    tokens: Arc<dyn TokenStore>,
) -> Arc<ApplicationServices> {
    assemble_services(clock, tickets, codes, tokens, test_policy())
}

fn assemble_services(
    clock: &ManualClock,
    tickets: Arc<dyn TicketStore>,
    codes: Arc<dyn AuthorizationCodeStore>,
    tokens: Arc<dyn TokenStore>,
    policy: ServicePolicy,
) -> Arc<ApplicationServices> {
    let access_tokens = BiscuitAccessTokenIssuer::new(mocks::TEST_BISCUIT_KEY, mocks::TEST_ISSUER)
        .expect("valid test key");

    Arc::new(ApplicationServices::new(
        tickets,
        codes,
        tokens,
        Arc::new(InMemoryClientRegistry::new(mocks::test_clients())),
        Arc::new(mocks::PlainSecretHasher),
        Arc::new(access_tokens),
        Arc::new(OsRngSecretGenerator),
        Arc::new(clock.clone()),
        policy,
    ))
}

pub fn build_services(clock: &ManualClock) -> Arc<ApplicationServices> {
    build_services_with_policy(clock, test_policy())
}

pub fn build_services_with_policy(
    clock: &ManualClock,
    policy: ServicePolicy,
) -> Arc<ApplicationServices> {
    assemble_services(
        clock,
        Arc::new(InMemoryTicketStore::new()),
        Arc::new(InMemoryAuthorizationCodeStore::new()),
        Arc::new(InMemoryTokenStore::new()),
        policy,
    )
}

pub fn build_test_state(services: Arc<ApplicationServices>) -> HttpState {
    HttpState {
        services,
        issuer: Arc::from(mocks::TEST_ISSUER),
        introspection_key: Some(Arc::from(mocks::INTROSPECTION_KEY)),
        allow_plain_pkce: true,
    }
}

pub struct TestApp {
    pub router: axum::Router,
    pub clock: ManualClock,
    pub services: Arc<ApplicationServices>,
}

pub fn make_test_app() -> TestApp {
    make_test_app_with_policy(test_policy())
}

pub fn make_test_app_with_policy(policy: ServicePolicy) -> TestApp {
    let clock = ManualClock::fixed();
    let services = build_services_with_policy(&clock, policy);
    let router = build_router(
        build_test_state(Arc::clone(&services)),
        &RouterOptions {
            allowed_origins: vec!["http://localhost:3000".into()],
            rate_limit: false,
        },
    );
    TestApp {
        router,
        clock,
        services,
    }
}

pub async fn make_test_router() -> axum::Router {
    make_test_app().router
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &axum::Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn post_json(app: &axum::Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn get(app: &axum::Router, uri: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn read_json(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Assert an OAuth error body `{error, error_description}` with the given status and code.
pub async fn assert_oauth_error(resp: Response, expected_status: StatusCode, expected_error: &str) -> Value {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let (_, json) = read_json(resp).await;
    assert_eq!(json["error"], expected_error, "unexpected body: {json}");
    assert!(
        json["error_description"].as_str().is_some_and(|d| !d.is_empty()),
        "expected non-empty error_description"
    );
    json
}

pub fn query_param(url: &str, name: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

pub fn s256(verifier: &str) -> String {
    s256_challenge(verifier)
}

/// POST /auth for the seeded client with an S256 challenge of [`VERIFIER`].
pub async fn start_authorization(app: &axum::Router, state: Option<&str>) -> String {
    let mut body = json!({
        "client_id": mocks::CLIENT_ID,
        "response_type": "code",
        "redirect_uri": mocks::REDIRECT_URI,
        "scope": "openid profile",
        "code_challenge": s256(VERIFIER),
        "code_challenge_method": "S256",
    });
    if let Some(state) = state {
        body["state"] = json!(state);
    }
    let (status, json) = read_json(post_json(app, "/auth", body).await).await;
    assert_eq!(status, StatusCode::OK, "unexpected /auth response: {json}");
    json["ticket"].as_str().expect("ticket present").to_string()
}

pub async fn decide(app: &axum::Router, ticket: &str, member_id: Value, approved: bool) -> Response {
    post_json(
        app,
        "/consent",
        json!({ "ticket": ticket, "member_id": member_id, "approved": approved }),
    )
    .await
}

/// Run authorization and consent as subject 42 and return the issued code.
pub async fn authorize_and_get_code(app: &axum::Router) -> String {
    let ticket = start_authorization(app, Some("xyz")).await;
    let (status, json) = read_json(decide(app, &ticket, json!(42), true).await).await;
    assert_eq!(status, StatusCode::OK, "unexpected /consent response: {json}");
    let redirect = json["redirect_to"].as_str().expect("redirect_to present");
    query_param(redirect, "code").expect("code in redirect")
}

pub async fn exchange_code(app: &axum::Router, code: &str) -> Response {
    post_json(
        app,
        "/token",
        json!({
            "grant_type": "authorization_code",
            "client_id": mocks::CLIENT_ID,
            "client_secret": mocks::CLIENT_SECRET,
            "code": code,
            "redirect_uri": mocks::REDIRECT_URI,
            "code_verifier": VERIFIER,
        }),
    )
    .await
}

/// Full flow up to a token pair; returns the token response body.
pub async fn obtain_tokens(app: &axum::Router) -> Value {
    let code = authorize_and_get_code(app).await;
    let (status, json) = read_json(exchange_code(app, &code).await).await;
    assert_eq!(status, StatusCode::OK, "unexpected /token response: {json}");
    json
}

pub async fn refresh(app: &axum::Router, refresh_token: &str, scope: Option<&str>) -> Response {
    let mut body = json!({
        "grant_type": "refresh_token",
        "client_id": mocks::CLIENT_ID,
        "client_secret": mocks::CLIENT_SECRET,
        "refresh_token": refresh_token,
    });
    if let Some(scope) = scope {
        body["scope"] = json!(scope);
    }
    post_json(app, "/token", body).await
}

pub async fn introspect(app: &axum::Router, token: &str) -> Value {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/introspect")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", mocks::INTROSPECTION_KEY))
        .body(Body::from(json!({ "token": token }).to_string()))
        .unwrap();
    let (status, json) = read_json(send(app, req).await).await;
    assert_eq!(status, StatusCode::OK, "unexpected /introspect response: {json}");
    json
}
