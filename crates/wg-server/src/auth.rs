// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Caller identity decoding
//!
//! Tokens are only ever used to learn who the caller is. A missing, malformed
//! or expired token makes the caller anonymous; it is never an error by itself.

use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use wg_access::Identity;

/// Authentication configuration
#[derive(Clone, Default)]
pub struct AuthConfig {
    jwt_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(wg_logging::redact))
            .finish()
    }
}

impl AuthConfig {
    /// Create auth config from JWT secret
    pub fn with_jwt_secret(secret: String) -> Self {
        Self {
            jwt_secret: Some(secret),
        }
    }

    /// Validate a JWT and return its claims
    pub fn validate_jwt(&self, token: &str) -> Option<Claims> {
        let secret = self.jwt_secret.as_ref()?;
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        match decode::<Claims>(token, &decoding_key, &Validation::default()) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer token");
                None
            }
        }
    }

    /// Identity carried by the request's `Authorization: Bearer` header
    pub fn identity_from_headers(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))?;
        self.validate_jwt(token.trim()).map(Identity::from)
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub level: String,
    pub exp: usize,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity::new(claims.name, claims.level)
    }
}

/// Identity of the caller, absent for anonymous requests
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(state.auth.identity_from_headers(&parts.headers)))
    }
}
