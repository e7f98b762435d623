// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tenant access control.
//!
//! [`policy`] holds the pure decision functions, [`AccessPolicyResolver`]
//! binds them to a live [`wg_config::ConfigStore`], and [`files`] confines
//! tenant-relative file requests to the tenant's file area.

pub mod files;
pub mod identity;
pub mod policy;
pub mod resolver;

pub use files::{mime_for, resolve, MediaType, PathDenied};
pub use identity::Identity;
pub use policy::{can_upload, can_view, resolve_tenant_policy, TenantPolicy};
pub use resolver::{AccessPolicyResolver, CreateTenantError};
