// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Media file uploads

use crate::auth::MaybeIdentity;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use wg_access::resolve;

/// Header naming the wiki an upload is for
pub const WIKI_NAME_HEADER: &str = "x-wiki-name";

/// Largest accepted upload body
pub const UPLOAD_BODY_LIMIT: usize = 10_000_000;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Must match the header when present
    #[serde(default)]
    pub wiki: Option<String>,
    pub tiddler: UploadedTiddler,
}

#[derive(Debug, Deserialize)]
pub struct UploadedTiddler {
    pub fields: UploadedFields,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFields {
    /// Destination, relative to the wiki's files
    pub title: String,
    /// Base64 file contents
    pub text: String,
}

/// `POST /upload`
pub async fn upload_file(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<StatusCode> {
    let wiki = headers
        .get(WIKI_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ServerError::NotAuthorized)?;
    if !state.resolver.can_upload(wiki, identity.identity()) {
        return Err(ServerError::NotAuthorized);
    }
    if !state.content.tenant_exists(wiki).await {
        return Err(ServerError::NotAuthorized);
    }

    let request: UploadRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("malformed upload: {}", e)))?;
    if let Some(body_wiki) = &request.wiki {
        if body_wiki != wiki {
            return Err(ServerError::BadRequest(format!(
                "upload body names wiki '{}' but header names '{}'",
                body_wiki, wiki
            )));
        }
    }
    let fields = request.tiddler.fields;
    let contents = STANDARD
        .decode(fields.text.trim())
        .map_err(|e| ServerError::BadRequest(format!("file contents are not base64: {}", e)))?;

    let files_root = state.content.files_root(wiki);
    let destination = resolve(&files_root, &fields.title).map_err(|_| {
        tracing::warn!(tenant = wiki, title = %fields.title, "upload escapes the wiki's files");
        ServerError::NotAuthorized
    })?;
    if destination == files_root {
        return Err(ServerError::BadRequest("upload needs a file name".to_string()));
    }

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&destination, &contents).await?;

    tracing::info!(
        tenant = wiki,
        path = %destination.display(),
        bytes = contents.len(),
        user = identity.identity().map(|i| i.name.as_str()),
        "file uploaded"
    );
    Ok(StatusCode::NO_CONTENT)
}
