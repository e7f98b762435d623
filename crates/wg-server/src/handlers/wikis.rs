// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Wiki page rendering

use crate::auth::MaybeIdentity;
use crate::content::ContentError;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Html,
};
use wg_access::Identity;

/// `GET /`: the configured root wiki, always with embedded assets
pub async fn root_wiki(
    State(state): State<AppState>,
    identity: MaybeIdentity,
) -> ServerResult<Html<String>> {
    let root = state.settings().root_wiki_name;
    render(&state, &root, identity.identity(), true).await
}

/// `GET /:wiki`
pub async fn tenant_wiki(
    State(state): State<AppState>,
    Path(wiki): Path<String>,
    identity: MaybeIdentity,
) -> ServerResult<Html<String>> {
    let include_assets = state.settings().ws_server.serve_plugin;
    render(&state, &wiki, identity.identity(), include_assets).await
}

async fn render(
    state: &AppState,
    tenant: &str,
    identity: Option<&Identity>,
    include_assets: bool,
) -> ServerResult<Html<String>> {
    if !state.resolver.can_view(tenant, identity) {
        return Err(ServerError::NotAuthorized);
    }
    if !state.content.tenant_exists(tenant).await {
        tracing::debug!(tenant, "authorized view of a wiki without content");
        return Err(ServerError::NotAuthorized);
    }

    match state.content.render_tenant(tenant, include_assets).await {
        Ok(html) => Ok(Html(html)),
        Err(ContentError::Missing(_)) => Err(ServerError::NotAuthorized),
        Err(e) => Err(e.into()),
    }
}
