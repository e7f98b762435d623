// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use wg_config::ConfigPaths;

/// Process-level settings; tenant policy and wiki locations live in the
/// layered configuration files instead
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Enable permissive CORS headers for development
    pub enable_cors: bool,

    /// HMAC secret for bearer token validation; without it every caller is anonymous
    pub jwt_secret: Option<String>,

    /// Directory containing `Config/Config.toml` and `Config/Local.toml`
    pub config_root: PathBuf,

    /// Replacement defaults file
    pub defaults_file: Option<PathBuf>,

    /// Replacement overrides file
    pub local_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolve the configuration file locations
    pub fn config_paths(&self) -> ConfigPaths {
        ConfigPaths::discover(&self.config_root)
            .with_defaults(self.defaults_file.clone())
            .with_local(self.local_file.clone())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            enable_cors: false,
            jwt_secret: None,
            config_root: PathBuf::from("."),
            defaults_file: None,
            local_file: None,
        }
    }
}
