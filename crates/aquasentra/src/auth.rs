//! Bearer token resolution.
//!
//! Account registration and password login live with the identity provider.
//! This module only turns a signed token into a [`Principal`], and can mint
//! tokens with the same secret for local tooling.

use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::config::AuthConfig;
use crate::reports::{Principal, PrincipalId, Role};

/// Claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenAuthority {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenAuthority {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            issuer: issuer.into(),
            ttl,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.issuer.clone(),
            Duration::minutes(config.token_ttl_minutes),
        )
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: principal.id.0.clone(),
            role: principal.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::Issuance)
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(
            |error| match error.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            },
        )?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(Principal {
            id: PrincipalId(data.claims.sub),
            role: data.claims.role,
        })
    }

    /// Resolve the principal from an `Authorization: Bearer` header value.
    pub fn resolve_header(&self, value: Option<&str>) -> Result<Principal, AuthError> {
        let token = value
            .and_then(|raw| raw.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingCredentials)?;
        self.verify(token)
    }
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no token, authorization denied")]
    MissingCredentials,
    #[error("token is not valid")]
    InvalidToken,
    #[error("token has expired")]
    Expired,
    #[error("unable to issue token")]
    Issuance,
    #[error("token authority is not installed on the router")]
    Misconfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Issuance | AuthError::Misconfigured => {
                error!(error = %self, "authentication unavailable");
                let body = Json(json!({ "message": "Internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            _ => {
                let body = Json(json!({ "message": self.to_string() }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
        }
    }
}

/// Extracts the caller from the bearer header using the `Arc<TokenAuthority>`
/// installed as a request extension.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Principal {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authority = parts
            .extensions
            .get::<Arc<TokenAuthority>>()
            .cloned()
            .ok_or(AuthError::Misconfigured)?;
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        authority.resolve_header(header_value)
    }
}
