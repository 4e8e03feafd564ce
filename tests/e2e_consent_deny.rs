mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::*;

#[tokio::test]
async fn denial_redirects_with_access_denied_and_state() {
    let app = make_test_app();
    let ticket = start_authorization(&app.router, Some("s-1")).await;

    let (status, body) = read_json(decide(&app.router, &ticket, json!(42), false).await).await;
    assert_eq!(status, StatusCode::OK);
    let redirect = body["redirect_to"].as_str().unwrap();
    assert!(redirect.starts_with(REDIRECT_URI));
    assert_eq!(query_param(redirect, "error").as_deref(), Some("access_denied"));
    assert_eq!(query_param(redirect, "state").as_deref(), Some("s-1"));
    assert!(query_param(redirect, "code").is_none());
}

#[tokio::test]
async fn denied_ticket_is_spent() {
    let app = make_test_app();
    let ticket = start_authorization(&app.router, None).await;

    let resp = decide(&app.router, &ticket, json!(42), false).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_oauth_error(
        decide(&app.router, &ticket, json!(42), true).await,
        StatusCode::BAD_REQUEST,
        "invalid_request",
    )
    .await;
}

#[tokio::test]
async fn empty_member_id_is_rejected_without_spending_the_ticket() {
    let app = make_test_app();
    let ticket = start_authorization(&app.router, None).await;

    assert_oauth_error(
        decide(&app.router, &ticket, json!(""), true).await,
        StatusCode::BAD_REQUEST,
        "invalid_request",
    )
    .await;

    let resp = decide(&app.router, &ticket, json!(7), true).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
