mod support;

use axum::http::StatusCode;
use support::*;

#[tokio::test]
async fn discovery_document_advertises_the_endpoints() {
    let app = make_test_router().await;
    let (status, doc) = read_json(get(&app, "/.well-known/openid-configuration").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["issuer"], TEST_ISSUER);
    assert_eq!(doc["authorization_endpoint"], format!("{TEST_ISSUER}/auth"));
    assert_eq!(doc["token_endpoint"], format!("{TEST_ISSUER}/token"));
    assert_eq!(doc["introspection_endpoint"], format!("{TEST_ISSUER}/introspect"));
    assert_eq!(doc["jwks_uri"], format!("{TEST_ISSUER}/.well-known/jwks.json"));

    let methods = doc["code_challenge_methods_supported"].as_array().unwrap();
    assert!(methods.iter().any(|m| m == "S256"));
    assert!(methods.iter().any(|m| m == "plain"));
    assert_eq!(doc["response_types_supported"][0], "code");
}

#[tokio::test]
async fn jwks_publishes_the_verification_key() {
    let app = make_test_router().await;
    let (status, jwks) = read_json(get(&app, "/.well-known/jwks.json").await).await;
    assert_eq!(status, StatusCode::OK);
    let keys = jwks["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["kty"], "OKP");
    assert!(keys[0]["x"].as_str().is_some_and(|x| !x.is_empty()));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = make_test_router().await;
    let (status, body) = read_json(get(&app, "/health").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = read_json(get(&app, "/openapi.json").await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/token").is_some());
    assert!(doc["paths"].get("/consent").is_some());
}
