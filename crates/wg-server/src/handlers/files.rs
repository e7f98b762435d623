// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Media file downloads
//!
//! Order matters: authorize, check the media type, confine the path, then read.

use crate::auth::MaybeIdentity;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use wg_access::{mime_for, resolve, Identity};

const FAVICON: &str = "favicon.ico";

/// `GET /files/*path` on the root wiki
pub async fn root_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    identity: MaybeIdentity,
) -> ServerResult<Response> {
    let root = state.settings().root_wiki_name;
    serve_file(&state, &root, &path, identity.identity()).await
}

/// `GET /:wiki/files/*path`
pub async fn tenant_file(
    State(state): State<AppState>,
    Path((wiki, path)): Path<(String, String)>,
    identity: MaybeIdentity,
) -> ServerResult<Response> {
    serve_file(&state, &wiki, &path, identity.identity()).await
}

/// `GET /favicon.ico`
pub async fn root_favicon(
    State(state): State<AppState>,
    identity: MaybeIdentity,
) -> ServerResult<Response> {
    let root = state.settings().root_wiki_name;
    serve_file(&state, &root, FAVICON, identity.identity()).await
}

/// `GET /:wiki/favicon.ico`
pub async fn tenant_favicon(
    State(state): State<AppState>,
    Path(wiki): Path<String>,
    identity: MaybeIdentity,
) -> ServerResult<Response> {
    serve_file(&state, &wiki, FAVICON, identity.identity()).await
}

async fn serve_file(
    state: &AppState,
    tenant: &str,
    user_path: &str,
    identity: Option<&Identity>,
) -> ServerResult<Response> {
    if !state.resolver.can_view(tenant, identity) {
        return Err(ServerError::NotAuthorized);
    }

    let user_path = user_path.trim_start_matches('/');
    let media_type = mime_for(std::path::Path::new(user_path))
        .ok_or_else(|| ServerError::NotFound(user_path.to_string()))?;

    let files_root = state.content.files_root(tenant);
    let file = resolve(&files_root, user_path).map_err(|_| {
        tracing::warn!(tenant, path = user_path, "file request escapes the wiki's files");
        ServerError::NotAuthorized
    })?;

    match tokio::fs::read(&file).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, media_type.as_str())], bytes).into_response()),
        Err(e) => {
            tracing::debug!(tenant, path = %file.display(), error = %e, "file not readable");
            Err(ServerError::NotFound(user_path.to_string()))
        }
    }
}
