// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration file path discovery

use crate::source::FileSource;
use std::path::{Path, PathBuf};

/// Directory, relative to the configuration root, holding both tiers
pub const CONFIG_DIR: &str = "Config";
/// File name of the read-only defaults tier
pub const DEFAULTS_FILE: &str = "Config.toml";
/// File name of the mutable local overrides tier
pub const LOCAL_FILE: &str = "Local.toml";

/// Locations of the two configuration tiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Defaults tier, possibly user supplied
    pub defaults: PathBuf,
    /// Standard defaults location, consulted when `defaults` cannot be read
    pub standard_defaults: PathBuf,
    /// Local overrides tier
    pub local: PathBuf,
}

impl ConfigPaths {
    /// Standard layout under `root`: `Config/Config.toml` and `Config/Local.toml`
    pub fn discover(root: &Path) -> Self {
        let dir = root.join(CONFIG_DIR);
        let defaults = dir.join(DEFAULTS_FILE);
        Self {
            standard_defaults: defaults.clone(),
            defaults,
            local: dir.join(LOCAL_FILE),
        }
    }

    /// Replace the defaults path while keeping the standard one as fallback
    pub fn with_defaults(mut self, defaults: Option<PathBuf>) -> Self {
        if let Some(defaults) = defaults {
            self.defaults = defaults;
        }
        self
    }

    /// Replace the local overrides path
    pub fn with_local(mut self, local: Option<PathBuf>) -> Self {
        if let Some(local) = local {
            self.local = local;
        }
        self
    }

    pub fn defaults_source(&self) -> FileSource {
        FileSource::new(&self.defaults).with_fallback(&self.standard_defaults)
    }

    pub fn local_source(&self) -> FileSource {
        FileSource::new(&self.local)
    }
}
