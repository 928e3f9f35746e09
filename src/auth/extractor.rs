use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Uri;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::SharedState;

/// Proof that the request carried the configured admin key.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

impl FromRequestParts<SharedState> for AdminKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(configured) = state.config.admin_key.as_deref() else {
            return Err(AppError::Misconfigured(
                "ADMIN_KEY is not configured".to_string(),
            ));
        };

        let candidate = candidate_key(parts);
        match candidate {
            Some(key) if verify(&key, configured.as_bytes()) => Ok(AdminKey),
            _ => Err(AppError::Unauthorized("Unauthorized".to_string())),
        }
    }
}

/// Pull the caller's key from, in order: `x-admin-key`, a Bearer
/// `Authorization` header, or the `key` query parameter.
/// Header values are taken as raw bytes.
pub fn candidate_key(parts: &Parts) -> Option<Vec<u8>> {
    if let Some(value) = parts.headers.get("x-admin-key") {
        return Some(value.as_bytes().to_vec());
    }

    if let Some(token) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
    {
        return Some(token.as_bytes().to_vec());
    }

    query_param(&parts.uri, "key").map(String::into_bytes)
}

/// First value of a query parameter. Repeated names are not an error.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    uri.query().and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    })
}

fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim_start();
    let (scheme, rest) = header.split_at_checked(6)?;
    if !scheme.eq_ignore_ascii_case("bearer") || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

/// Exact byte equality; empty candidates never match.
fn verify(candidate: &[u8], configured: &[u8]) -> bool {
    !candidate.is_empty() && bool::from(candidate.ct_eq(configured))
}
