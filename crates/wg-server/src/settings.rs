// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed view of the gateway settings stored in the effective configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};
use wg_config::{extract, ConfigResult, ConfigTree};

/// Value of `wikiPathBase` that stands for the user's home directory
pub const HOME_DIR_BASE: &str = "homedir";

/// Where wikis live and how they are served
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WikiSettings {
    /// Base directory; relative values are taken from the configuration root
    pub wiki_path_base: String,
    /// Directory under the base holding one directory per tenant
    pub wikis_path: String,
    /// Tenant served at `/`
    pub root_wiki_name: String,
    #[serde(rename = "ws-server")]
    pub ws_server: WsServerSettings,
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            wiki_path_base: ".".to_string(),
            wikis_path: "Wikis".to_string(),
            root_wiki_name: "IndexWiki".to_string(),
            ws_server: WsServerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WsServerSettings {
    /// Serve wikis with their embedded asset section; `false` strips it
    pub serve_plugin: bool,
}

impl Default for WsServerSettings {
    fn default() -> Self {
        Self { serve_plugin: true }
    }
}

impl WikiSettings {
    pub fn from_config(effective: &ConfigTree) -> ConfigResult<Self> {
        extract::get(effective)
    }

    /// Directory holding every tenant
    pub fn wikis_dir(&self, config_root: &Path) -> PathBuf {
        let base = if self.wiki_path_base == HOME_DIR_BASE {
            dirs::home_dir().unwrap_or_else(|| config_root.to_path_buf())
        } else {
            config_root.join(&self.wiki_path_base)
        };
        base.join(&self.wikis_path)
    }
}
