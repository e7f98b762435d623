// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tenant policy model and the pure authorization decisions
//!
//! Policies live in the effective configuration under `wikis.<tenant>`:
//!
//! ```toml
//! [wikis.notes]
//! public = false
//! owner = "alice"
//! [wikis.notes.access]
//! Guest = ["view"]
//! Editor = ["view", "upload", "edit"]
//! ```
//!
//! Anything that does not have the expected shape is ignored, which can only
//! ever remove a grant.

use crate::identity::Identity;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use wg_config::{fragment, ConfigTree, ConfigValue};

/// Top-level key holding every tenant policy
pub const WIKIS_KEY: &str = "wikis";

/// Capability names known to the gateway; tenants may grant any other name too
pub mod capability {
    pub const VIEW: &str = "view";
    pub const UPLOAD: &str = "upload";
}

/// Access policy of a single tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantPolicy {
    pub public: bool,
    pub owner: Option<String>,
    /// Level name to the capabilities granted to that level
    pub access: BTreeMap<String, BTreeSet<String>>,
}

impl TenantPolicy {
    /// Read a policy out of its configuration subtree
    pub fn from_tree(tree: &ConfigTree) -> Self {
        let access = tree
            .subtree("access")
            .map(|access| {
                access
                    .iter()
                    .filter_map(|(level, granted)| {
                        let granted: BTreeSet<String> = granted
                            .as_sequence()?
                            .iter()
                            .filter_map(ConfigValue::as_str)
                            .map(str::to_string)
                            .collect();
                        Some((level.clone(), granted))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            public: tree.get("public").and_then(ConfigValue::as_bool).unwrap_or(false),
            owner: tree.get("owner").and_then(ConfigValue::as_str).map(str::to_string),
            access,
        }
    }

    /// Whether `level` has been granted `capability`
    pub fn grants(&self, level: &str, capability: &str) -> bool {
        self.access
            .get(level)
            .is_some_and(|granted| granted.contains(capability))
    }

    fn is_owned_by(&self, name: &str) -> bool {
        self.owner.as_deref() == Some(name)
    }
}

/// Policy of `tenant` in `effective`, or the default (closed) policy when none is recorded
pub fn resolve_tenant_policy(effective: &ConfigTree, tenant: &str) -> TenantPolicy {
    effective
        .subtree(WIKIS_KEY)
        .and_then(|wikis| wikis.subtree(tenant))
        .map(TenantPolicy::from_tree)
        .unwrap_or_default()
}

/// Whether `identity` may view a tenant governed by `policy`
pub fn can_view(policy: &TenantPolicy, identity: Option<&Identity>) -> bool {
    if policy.public {
        return true;
    }
    let Some(identity) = identity else {
        return false;
    };
    policy.is_owned_by(&identity.name) || policy.grants(&identity.level, capability::VIEW)
}

/// Whether `identity` may upload files to a tenant governed by `policy`
///
/// Ownership alone does not grant uploads.
pub fn can_upload(policy: &TenantPolicy, identity: Option<&Identity>) -> bool {
    identity.is_some_and(|identity| policy.grants(&identity.level, capability::UPLOAD))
}

/// Configuration fragment recording a newly created tenant
///
/// `{wikis: {<name>: {public, owner}}}`; no access entries are granted.
pub fn tenant_policy_fragment(name: &str, creator: &Identity, public: bool) -> ConfigTree {
    let mut entry = ConfigTree::new();
    entry.insert("public", public);
    entry.insert("owner", creator.name.as_str());
    fragment(&[WIKIS_KEY, name], entry)
}
