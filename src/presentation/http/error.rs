// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::errors::DomainError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth 2.0 error response (RFC 6749 §5.2).
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    description: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(msg)
            | ApplicationError::NotFound(msg)
            | ApplicationError::Expired(msg)
            | ApplicationError::AlreadyConsumed(msg) => Self::invalid_request(msg),
            ApplicationError::Mismatch(msg) | ApplicationError::InvalidGrant(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_grant", msg)
            }
            ApplicationError::InvalidClient(msg) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_client", msg)
            }
            ApplicationError::InvalidScope(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_scope", msg)
            }
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "request failed on infrastructure error");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "the authorization server encountered an unexpected condition",
                )
            }
            ApplicationError::Domain(domain_err) => Self::from_domain(domain_err),
        }
    }

    fn from_domain(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::invalid_request(msg),
            DomainError::UnsupportedResponseType(value) => Self::new(
                StatusCode::BAD_REQUEST,
                "unsupported_response_type",
                format!("response_type '{value}' is not supported"),
            ),
            DomainError::UnsupportedGrantType(value) => Self::new(
                StatusCode::BAD_REQUEST,
                "unsupported_grant_type",
                format!("grant_type '{value}' is not supported"),
            ),
            DomainError::InvalidScope(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_scope", msg)
            }
        }
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", description)
    }

    pub fn invalid_client(description: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid_client", description)
    }

    fn new(status: StatusCode, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.code.to_string(),
            error_description: self.description,
        };
        let mut response = (self.status, Json(payload)).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable OAuth error code, e.g. `invalid_grant`.
    pub error: String,
    pub error_description: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redemption_failures_on_codes_share_one_code() {
        let mismatch = HttpError::from_error(ApplicationError::mismatch("x"));
        let invalid = HttpError::from_error(ApplicationError::invalid_grant("x"));
        assert_eq!(mismatch.code(), "invalid_grant");
        assert_eq!(invalid.code(), "invalid_grant");
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn status_codes_follow_the_error_kind() {
        let cases = [
            (ApplicationError::invalid_client("x"), StatusCode::UNAUTHORIZED, "invalid_client"),
            (ApplicationError::expired("x"), StatusCode::BAD_REQUEST, "invalid_request"),
            (ApplicationError::invalid_scope("x"), StatusCode::BAD_REQUEST, "invalid_scope"),
            (
                ApplicationError::infrastructure("redis down"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
            ),
            (
                DomainError::UnsupportedGrantType("password".into()).into(),
                StatusCode::BAD_REQUEST,
                "unsupported_grant_type",
            ),
        ];
        for (err, status, code) in cases {
            let http = HttpError::from_error(err);
            assert_eq!(http.status(), status);
            assert_eq!(http.code(), code);
        }
    }

    #[test]
    fn infrastructure_detail_is_not_leaked() {
        let http = HttpError::from_error(ApplicationError::infrastructure("redis://secret@host"));
        assert!(!http.description.contains("redis"));
    }
}
