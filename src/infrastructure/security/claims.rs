// src/infrastructure/security/claims.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::oauth::{AccessTokenClaims, ClientId, GrantId, ScopeSet, Subject};
use biscuit_auth::builder::{Fact, Predicate, Term};
use chrono::{DateTime, Utc};

pub fn parse_claims(facts: Vec<Fact>, expected_issuer: &str) -> ApplicationResult<AccessTokenClaims> {
    let ctx = ClaimsContext::from_facts(facts);

    if ctx.issuer.as_deref() != Some(expected_issuer) {
        return Err(ApplicationError::invalid_grant("token issuer mismatch"));
    }

    let token_id = required(ctx.token_id, "token_id")?;
    let grant_id = GrantId::from_raw(required(ctx.grant_id, "grant")?);
    let client_id = ClientId::new(required(ctx.client_id, "client")?)?;
    let subject = Subject::new(required(ctx.subject, "subject")?)?;
    let scope = ScopeSet::from_tokens(&ctx.scopes)?;
    let issued_at = required(ctx.issued_at, "issued_at")?;
    let expires_at = required(ctx.expires_at, "expires_at")?;

    Ok(AccessTokenClaims {
        token_id,
        grant_id,
        client_id,
        subject,
        scope,
        issued_at,
        expires_at,
    })
}

fn required<T>(value: Option<T>, name: &str) -> ApplicationResult<T> {
    value.ok_or_else(|| ApplicationError::invalid_grant(format!("missing {name}")))
}

#[derive(Default)]
struct ClaimsContext {
    token_id: Option<String>,
    issuer: Option<String>,
    grant_id: Option<String>,
    client_id: Option<String>,
    subject: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    scopes: Vec<String>,
}

impl ClaimsContext {
    fn from_facts(facts: Vec<Fact>) -> Self {
        let mut ctx = Self::default();
        for fact in facts {
            ctx.apply_predicate(fact.predicate);
        }
        ctx
    }

    fn apply_predicate(&mut self, predicate: Predicate) {
        let Some(term) = predicate.terms.into_iter().next() else {
            return;
        };
        match (predicate.name.as_str(), term) {
            ("token_id", Term::Str(value)) => self.token_id = Some(value),
            ("issuer", Term::Str(value)) => self.issuer = Some(value),
            ("grant", Term::Str(value)) => self.grant_id = Some(value),
            ("client", Term::Str(value)) => self.client_id = Some(value),
            ("subject", Term::Str(value)) => self.subject = Some(value),
            ("scope", Term::Str(value)) => self.scopes.push(value),
            ("issued_at", Term::Date(seconds)) => self.issued_at = date(seconds),
            ("expires_at", Term::Date(seconds)) => self.expires_at = date(seconds),
            _ => {}
        }
    }
}

fn date(seconds: u64) -> Option<DateTime<Utc>> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
