// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Wikigate HTTP gateway
//!
//! Serves per-tenant wikis and their media files, accepts uploads and lets
//! authenticated users create new tenants. Every request is authorized through
//! [`wg_access::AccessPolicyResolver`] before any content is touched.

pub mod auth;
pub mod config;
pub mod content;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod server;
pub mod settings;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::Server;
