// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server state management

use crate::auth::AuthConfig;
use crate::content::ContentStore;
use crate::settings::WikiSettings;
use std::sync::Arc;
use wg_access::AccessPolicyResolver;
use wg_config::ConfigStore;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Live two-tier configuration
    pub config_store: Arc<ConfigStore>,

    /// Authorization decisions over `config_store`
    pub resolver: AccessPolicyResolver,

    /// Rendered wiki content
    pub content: Arc<dyn ContentStore>,

    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(config_store: Arc<ConfigStore>, content: Arc<dyn ContentStore>, auth: AuthConfig) -> Self {
        Self {
            resolver: AccessPolicyResolver::new(Arc::clone(&config_store)),
            config_store,
            content,
            auth,
        }
    }

    /// Gateway settings as currently configured, defaults where unreadable
    pub fn settings(&self) -> WikiSettings {
        WikiSettings::from_config(&self.config_store.effective()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid wiki settings, using defaults");
            WikiSettings::default()
        })
    }
}
