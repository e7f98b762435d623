// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tenant creation

use crate::auth::MaybeIdentity;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use wg_access::TenantPolicy;

/// Names that would be shadowed by fixed routes
const RESERVED_NAMES: &[&str] = &[
    "api",
    "favicon.ico",
    "files",
    "healthz",
    "readyz",
    "upload",
    "version",
];

#[derive(Debug, Deserialize)]
pub struct CreateWikiRequest {
    pub name: String,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateWikiResponse {
    pub name: String,
    #[serde(flatten)]
    pub policy: TenantPolicy,
}

/// `POST /api/wikis`: record the caller as owner of a new wiki
pub async fn create_wiki(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Json(request): Json<CreateWikiRequest>,
) -> ServerResult<(StatusCode, Json<CreateWikiResponse>)> {
    let creator = identity.0.ok_or(ServerError::NotAuthorized)?;
    validate_wiki_name(&request.name)?;

    let resolver = state.resolver.clone();
    let name = request.name.clone();
    let policy = tokio::task::spawn_blocking(move || {
        resolver.create_tenant_policy(&name, &creator, request.public)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("tenant creation did not complete: {}", e)))??;

    Ok((
        StatusCode::CREATED,
        Json(CreateWikiResponse {
            name: request.name,
            policy,
        }),
    ))
}

/// A wiki name must be a single plain path segment
pub fn validate_wiki_name(name: &str) -> ServerResult<()> {
    let invalid = |reason: &str| Err(ServerError::BadRequest(format!("invalid wiki name '{}': {}", name, reason)));

    if name.is_empty() || name.trim() != name {
        return invalid("empty or padded with whitespace");
    }
    if name == "." || name == ".." {
        return invalid("relative path segment");
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return invalid("contains a separator or control character");
    }
    if RESERVED_NAMES.contains(&name) {
        return invalid("reserved");
    }
    Ok(())
}
