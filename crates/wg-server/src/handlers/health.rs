// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Health check endpoints

use crate::state::AppState;
use crate::ServerResult;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    fn now(status: &str) -> Self {
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Liveness; answers as long as the process serves requests
pub async fn health_check() -> ServerResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse::now("ok")))
}

/// Ready once the root wiki has content to serve
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let root = state.settings().root_wiki_name;
    if state.content.tenant_exists(&root).await {
        (StatusCode::OK, Json(HealthResponse::now("ready")))
    } else {
        tracing::debug!(root_wiki = %root, "root wiki not found");
        (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::now("root wiki missing")))
    }
}

pub async fn version() -> ServerResult<Json<VersionResponse>> {
    Ok(Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
