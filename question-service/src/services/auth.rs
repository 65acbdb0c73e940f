use axum::http::{header, HeaderMap};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

pub const X_API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_HEADER: &str = "api-key";

/// Shared-secret check for the lookup endpoint.
///
/// With no secret configured every request passes. That mode exists for local
/// development and is not meant to be deployed.
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    secret: Option<Secret<String>>,
}

impl ApiKeyAuthenticator {
    pub fn new(secret: Option<Secret<String>>) -> Self {
        let secret = secret.filter(|s| !s.expose_secret().is_empty());
        Self { secret }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };

        match presented_key(headers) {
            Some(candidate) => candidate
                .as_bytes()
                .ct_eq(secret.expose_secret().as_bytes())
                .into(),
            None => false,
        }
    }
}

/// First non-empty key among `x-api-key`, `authorization` (minus a leading
/// `Bearer `) and `api-key`, in that order.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    header_value(headers, X_API_KEY_HEADER)
        .or_else(|| {
            header_value(headers, header::AUTHORIZATION.as_str())
                .map(|v| v.strip_prefix("Bearer ").unwrap_or(v))
                .filter(|v| !v.is_empty())
        })
        .or_else(|| header_value(headers, API_KEY_HEADER))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
