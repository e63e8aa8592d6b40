use axum::http::{HeaderMap, header};
use crate::error::{AppError, AppResult};

// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
}

// Token verification is owned by an external auth service; the gateway only
// needs to ask whether a bearer token is good.
pub trait Authenticator: Send + Sync {
    fn verify(&self, token: &str) -> Option<Principal>;
}

// Single shared secret, for deployments without an auth service
pub struct StaticTokenAuthenticator {
    token: String,
    author: String,
}

impl StaticTokenAuthenticator {
    pub fn new(token: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            author: author.into(),
        }
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn verify(&self, token: &str) -> Option<Principal> {
        if self.token.is_empty() || token != self.token {
            return None;
        }
        Some(Principal {
            name: self.author.clone(),
        })
    }
}

// "Authorization: Bearer <token>"
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub fn authenticate(auth: &dyn Authenticator, headers: &HeaderMap) -> AppResult<Principal> {
    let token = extract_bearer(headers).ok_or(AppError::MissingToken)?;
    auth.verify(token).ok_or(AppError::InvalidToken)
}
