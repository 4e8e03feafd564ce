mod support;

use authgate::application::{
    commands::{consent::ConsentCommand, tokens::ExchangeCodeCommand},
    ports::{authorization_code::AuthorizationCodeStore, ticket_store::TicketStore},
};
use authgate::domain::oauth::{
    AuthorizationCode, AuthorizationRequest, AuthorizationTicket, ClientId, CodeChallengeMethod,
    PkceChallenge, RedirectUri, ResponseType, ScopeSet, Subject, TicketId, fingerprint,
};
use authgate::infrastructure::security::{
    authorization_code_store::InMemoryAuthorizationCodeStore, ticket_store::InMemoryTicketStore,
};
use chrono::Duration;
use std::sync::Arc;
use support::*;

const CONTENDERS: usize = 32;

fn sample_code(raw: &str) -> AuthorizationCode {
    let now = fixed_now();
    AuthorizationCode {
        fingerprint: fingerprint(raw),
        client_id: ClientId::new(CLIENT_ID).unwrap(),
        redirect_uri: RedirectUri::new(REDIRECT_URI).unwrap(),
        scope: ScopeSet::parse("openid").unwrap(),
        subject: Subject::new("42").unwrap(),
        pkce: PkceChallenge::new(s256(VERIFIER), CodeChallengeMethod::S256).unwrap(),
        issued_at: now,
        expires_at: now + Duration::seconds(60),
    }
}

fn sample_ticket(id: &str) -> AuthorizationTicket {
    let now = fixed_now();
    AuthorizationTicket {
        id: TicketId::new(id).unwrap(),
        request: AuthorizationRequest {
            client_id: ClientId::new(CLIENT_ID).unwrap(),
            response_type: ResponseType::Code,
            redirect_uri: RedirectUri::new(REDIRECT_URI).unwrap(),
            scope: ScopeSet::parse("openid").unwrap(),
            state: None,
            pkce: PkceChallenge::new(s256(VERIFIER), CodeChallengeMethod::S256).unwrap(),
        },
        created_at: now,
        expires_at: now + Duration::seconds(600),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_code_consumers_have_exactly_one_winner() {
    let store = Arc::new(InMemoryAuthorizationCodeStore::new());
    store.insert(sample_code("race"), fixed_now()).await.unwrap();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.consume(&fingerprint("race"), fixed_now()).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_ticket_consumers_have_exactly_one_winner() {
    let store = Arc::new(InMemoryTicketStore::new());
    store.insert(sample_ticket("ticket-race"), fixed_now()).await.unwrap();
    let id = TicketId::new("ticket-race").unwrap();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let store = Arc::clone(&store);
            let id = id.clone();
            tokio::spawn(async move { store.consume(&id, fixed_now()).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_consent_and_exchange_issue_one_code_and_one_pair() {
    let app = make_test_app();
    let ticket = start_authorization(&app.router, None).await;

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let services = Arc::clone(&app.services);
            let ticket = ticket.clone();
            tokio::spawn(async move {
                services
                    .consent
                    .decide(ConsentCommand {
                        ticket,
                        subject: "42".into(),
                        approved: true,
                    })
                    .await
            })
        })
        .collect();

    let mut redirects = Vec::new();
    for handle in handles {
        if let Ok(outcome) = handle.await.unwrap() {
            redirects.push(outcome.redirect_to);
        }
    }
    assert_eq!(redirects.len(), 1);
    let code = query_param(&redirects[0], "code").unwrap();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let services = Arc::clone(&app.services);
            let code = code.clone();
            tokio::spawn(async move {
                services
                    .tokens
                    .exchange(ExchangeCodeCommand {
                        grant_type: "authorization_code".into(),
                        code: Some(code),
                        redirect_uri: Some(REDIRECT_URI.into()),
                        code_verifier: Some(VERIFIER.into()),
                        client_id: CLIENT_ID.into(),
                        client_secret: Some(CLIENT_SECRET.into()),
                        state: None,
                    })
                    .await
            })
        })
        .collect();

    let mut pairs = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            pairs += 1;
        }
    }
    assert_eq!(pairs, 1);
}
