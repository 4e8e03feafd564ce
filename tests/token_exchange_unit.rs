mod support;

use authgate::application::{
    commands::{
        consent::ConsentCommand,
        tickets::CreateTicketCommand,
        tokens::ExchangeCodeCommand,
    },
    error::ApplicationError,
    services::ApplicationServices,
};
use chrono::Duration;
use support::*;

async fn issue_code(services: &ApplicationServices, challenge: &str, method: &str) -> String {
    let ticket = services
        .tickets
        .create(CreateTicketCommand {
            client_id: CLIENT_ID.into(),
            response_type: "code".into(),
            redirect_uri: REDIRECT_URI.into(),
            scope: Some("openid".into()),
            state: None,
            code_challenge: Some(challenge.into()),
            code_challenge_method: Some(method.into()),
        })
        .await
        .expect("ticket issued");

    let outcome = services
        .consent
        .decide(ConsentCommand {
            ticket: ticket.ticket.to_string(),
            subject: "42".into(),
            approved: true,
        })
        .await
        .expect("consent granted");
    query_param(&outcome.redirect_to, "code").expect("code in redirect")
}

fn exchange(code: &str) -> ExchangeCodeCommand {
    ExchangeCodeCommand {
        grant_type: "authorization_code".into(),
        code: Some(code.into()),
        redirect_uri: Some(REDIRECT_URI.into()),
        code_verifier: Some(VERIFIER.into()),
        client_id: CLIENT_ID.into(),
        client_secret: Some(CLIENT_SECRET.into()),
        state: None,
    }
}

fn assert_invalid_code(err: &ApplicationError) {
    match err {
        ApplicationError::InvalidGrant(msg) | ApplicationError::Mismatch(msg) => {
            assert_eq!(msg, "authorization code is invalid");
        }
        other => panic!("expected an invalid_grant failure, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_verifier_fails_and_burns_the_code() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let code = issue_code(&services, &s256(VERIFIER), "S256").await;

    let mut wrong = VERIFIER.to_string();
    wrong.replace_range(0..1, "e");
    let err = services
        .tokens
        .exchange(ExchangeCodeCommand {
            code_verifier: Some(wrong),
            ..exchange(&code)
        })
        .await
        .unwrap_err();
    assert_invalid_code(&err);

    let err = services.tokens.exchange(exchange(&code)).await.unwrap_err();
    assert_invalid_code(&err);
}

#[tokio::test]
async fn redirect_uri_must_match_exactly() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let code = issue_code(&services, &s256(VERIFIER), "S256").await;

    let err = services
        .tokens
        .exchange(ExchangeCodeCommand {
            redirect_uri: Some(format!("{REDIRECT_URI}/")),
            ..exchange(&code)
        })
        .await
        .unwrap_err();
    assert_invalid_code(&err);
}

#[tokio::test]
async fn code_is_bound_to_the_client_it_was_issued_to() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let code = issue_code(&services, &s256(VERIFIER), "S256").await;

    let err = services
        .tokens
        .exchange(ExchangeCodeCommand {
            client_id: OTHER_CLIENT_ID.into(),
            client_secret: Some(OTHER_CLIENT_SECRET.into()),
            ..exchange(&code)
        })
        .await
        .unwrap_err();
    assert_invalid_code(&err);
}

#[tokio::test]
async fn expired_code_is_rejected() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let code = issue_code(&services, &s256(VERIFIER), "S256").await;

    clock.advance(Duration::seconds(60));
    let err = services.tokens.exchange(exchange(&code)).await.unwrap_err();
    assert_invalid_code(&err);
}

#[tokio::test]
async fn code_just_before_expiry_is_accepted() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let code = issue_code(&services, VERIFIER, "plain").await;

    clock.advance(Duration::seconds(59));
    let pair = services.tokens.exchange(exchange(&code)).await.unwrap();
    assert_eq!(pair.scope, "openid");
    assert_eq!(pair.token_type, "Bearer");
}

#[tokio::test]
async fn unknown_code_is_an_invalid_grant() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let err = services
        .tokens
        .exchange(exchange("never-issued"))
        .await
        .unwrap_err();
    assert_invalid_code(&err);
}

#[tokio::test]
async fn unknown_client_secret_fails_client_authentication() {
    let clock = ManualClock::fixed();
    let services = build_services(&clock);
    let code = issue_code(&services, &s256(VERIFIER), "S256").await;

    let err = services
        .tokens
        .exchange(ExchangeCodeCommand {
            client_secret: None,
            ..exchange(&code)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::InvalidClient(_)));
}
