// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for the gateway

use crate::{
    auth::AuthConfig,
    config::ServerConfig,
    content::{ContentStore, FsContentStore},
    settings::WikiSettings,
    state::AppState,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use wg_config::ConfigStore;

/// Default dependency builder: file-backed configuration and wiki content
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    /// Load the configuration tiers and locate the wiki directory
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let config_root = std::path::absolute(&config.config_root).with_context(|| {
            format!("resolving config root {}", config.config_root.display())
        })?;
        let paths = config.config_paths();
        let store = Arc::new(ConfigStore::load_paths(&paths));

        let settings = WikiSettings::from_config(&store.effective())
            .context("reading wiki settings from configuration")?;
        let wikis_dir = settings.wikis_dir(&config_root);
        tracing::info!(
            defaults = %paths.defaults.display(),
            local = %paths.local.display(),
            wikis = %wikis_dir.display(),
            root_wiki = %settings.root_wiki_name,
            "configuration loaded"
        );

        let content: Arc<dyn ContentStore> = Arc::new(FsContentStore::new(wikis_dir));
        let auth = match &config.jwt_secret {
            Some(secret) => AuthConfig::with_jwt_secret(secret.clone()),
            None => {
                tracing::warn!("no JWT secret configured, all requests are anonymous");
                AuthConfig::default()
            }
        };

        Ok(Self {
            state: AppState::new(store, content, auth),
        })
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
