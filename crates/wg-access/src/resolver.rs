// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Authorization entry points used by the request gateway

use crate::identity::Identity;
use crate::policy::{self, TenantPolicy};
use std::sync::Arc;
use wg_config::{ConfigError, ConfigStore, ConfigTree};

/// Why a tenant policy could not be created
#[derive(Debug, thiserror::Error)]
pub enum CreateTenantError {
    /// A policy for the tenant is already recorded; ownership is never reassigned
    #[error("tenant '{0}' already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Answers authorization questions against the live effective configuration
#[derive(Debug, Clone)]
pub struct AccessPolicyResolver {
    store: Arc<ConfigStore>,
}

impl AccessPolicyResolver {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Policy currently in force for `tenant`
    pub fn policy(&self, tenant: &str) -> TenantPolicy {
        policy::resolve_tenant_policy(&self.store.effective(), tenant)
    }

    pub fn can_view(&self, tenant: &str, identity: Option<&Identity>) -> bool {
        let allowed = policy::can_view(&self.policy(tenant), identity);
        tracing::debug!(
            tenant,
            user = identity.map(|i| i.name.as_str()),
            allowed,
            "view check"
        );
        allowed
    }

    pub fn can_upload(&self, tenant: &str, identity: Option<&Identity>) -> bool {
        let allowed = policy::can_upload(&self.policy(tenant), identity);
        tracing::debug!(
            tenant,
            user = identity.map(|i| i.name.as_str()),
            allowed,
            "upload check"
        );
        allowed
    }

    /// Record `creator` as owner of the new tenant `name` and persist it
    ///
    /// Fails with [`CreateTenantError::AlreadyExists`] when a policy for `name`
    /// is present, including one written to the overrides file since start-up.
    /// The check and the write happen under the store's writer lock. Blocks on
    /// configuration file I/O.
    pub fn create_tenant_policy(
        &self,
        name: &str,
        creator: &Identity,
        requested_public: bool,
    ) -> Result<TenantPolicy, CreateTenantError> {
        let setting = policy::tenant_policy_fragment(name, creator, requested_public);
        let created = self
            .store
            .apply_setting_if(&setting, |current| !policy_recorded(current, name))?;
        if !created {
            return Err(CreateTenantError::AlreadyExists(name.to_string()));
        }
        tracing::info!(tenant = name, owner = %creator.name, public = requested_public, "tenant policy created");
        Ok(self.policy(name))
    }
}

fn policy_recorded(effective: &ConfigTree, tenant: &str) -> bool {
    effective.lookup(&[policy::WIKIS_KEY, tenant]).is_some()
}
