//! Bearer token authentication.
//!
//! Every route except the configured public paths requires an
//! `Authorization: Bearer <token>` header. The token is an HMAC-signed JWT
//! (HS256, HS384 or HS512) checked against the shared secret. Expiry and
//! not-before claims are enforced when present; no claim is mandatory.

use std::fmt;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use crate::error::{ApiError, AuthError};
use crate::service::AppState;

/// Decides whether a bearer token is acceptable.
pub trait TokenVerifier: Send + Sync {
    /// Verify `token`, returning [`AuthError::InvalidToken`] on rejection.
    fn verify(&self, token: &str) -> Result<(), AuthError>;
}

/// Verifies HMAC-signed JWTs against a shared secret.
pub struct HmacJwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl HmacJwtVerifier {
    /// Create a verifier for `secret`.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.validate_nbf = true;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl fmt::Debug for HmacJwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacJwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier for HmacJwtVerifier {
    fn verify(&self, token: &str) -> Result<(), AuthError> {
        decode::<serde_json::Value>(token, &self.key, &self.validation)
            .map(|_| ())
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value is split once on the first space; the scheme must be `Bearer`
/// in any letter case. An empty token is passed through so the verifier
/// rejects it.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidFormat)?;
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidFormat)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::InvalidFormat);
    }
    Ok(token)
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers().get(AUTHORIZATION))?;
    state.verifier.verify(token)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";

    fn sign(alg: Algorithm, claims: serde_json::Value, secret: &[u8]) -> String {
        encode(&Header::new(alg), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        let ok = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(bearer_token(Some(&ok)), Ok("abc.def.ghi"));

        let lower = HeaderValue::from_static("bearer xyz");
        assert_eq!(bearer_token(Some(&lower)), Ok("xyz"));
    }

    #[test]
    fn test_bearer_token_missing() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingHeader));
        let empty = HeaderValue::from_static("");
        assert_eq!(bearer_token(Some(&empty)), Err(AuthError::MissingHeader));
    }

    #[test]
    fn test_bearer_token_bad_format() {
        for raw in ["Basic dXNlcjpwYXNz", "Bearer", "Token abc"] {
            let value = HeaderValue::from_static(raw);
            assert_eq!(
                bearer_token(Some(&value)),
                Err(AuthError::InvalidFormat),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_bearer_token_keeps_remainder() {
        // Only the first space splits; the rest belongs to the token.
        let value = HeaderValue::from_static("Bearer a b");
        assert_eq!(bearer_token(Some(&value)), Ok("a b"));
    }

    #[test]
    fn test_verify_accepts_hmac_family() {
        let verifier = HmacJwtVerifier::new(SECRET);
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = sign(alg, json!({ "sub": "demo" }), SECRET);
            assert_eq!(verifier.verify(&token), Ok(()), "{alg:?}");
        }
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let verifier = HmacJwtVerifier::new(SECRET);
        let token = sign(Algorithm::HS256, json!({ "sub": "demo" }), b"other");
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_expiry() {
        let verifier = HmacJwtVerifier::new(SECRET);
        let now = get_current_timestamp();

        let expired = sign(Algorithm::HS256, json!({ "exp": now - 3600 }), SECRET);
        assert_eq!(verifier.verify(&expired), Err(AuthError::InvalidToken));

        let fresh = sign(Algorithm::HS256, json!({ "exp": now + 3600 }), SECRET);
        assert_eq!(verifier.verify(&fresh), Ok(()));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let verifier = HmacJwtVerifier::new(SECRET);
        assert_eq!(verifier.verify(""), Err(AuthError::InvalidToken));
        assert_eq!(verifier.verify("not-a-jwt"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", HmacJwtVerifier::new(SECRET));
        assert!(!debug.contains("test-secret"));
    }
}
