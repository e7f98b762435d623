// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Process-wide configuration state
//!
//! [`ConfigStore`] owns the two configuration tiers. Readers take cheap
//! [`Arc`] snapshots of the effective tree; writers build a complete
//! replacement tree and publish it with a single pointer swap, so a reader
//! never observes a partially applied setting.

use crate::error::{ConfigError, ConfigResult};
use crate::loader::{read_tree, read_tree_or_empty, to_toml_string};
use crate::merge::deep_merge;
use crate::paths::ConfigPaths;
use crate::source::ConfigSource;
use crate::tree::ConfigTree;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
struct Snapshot {
    effective: Arc<ConfigTree>,
    overrides: Arc<ConfigTree>,
}

/// Defaults tier, local overrides tier and their merged effective view
pub struct ConfigStore {
    defaults_source: Box<dyn ConfigSource>,
    overrides_source: Box<dyn ConfigSource>,
    snapshot: RwLock<Snapshot>,
    // Held across the whole read-merge-write-publish sequence of apply_setting
    writer: Mutex<()>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("defaults", &self.defaults_source.describe())
            .field("overrides", &self.overrides_source.describe())
            .finish_non_exhaustive()
    }
}

fn build_snapshot(defaults: &dyn ConfigSource, overrides: &dyn ConfigSource) -> Snapshot {
    let mut effective = read_tree_or_empty(defaults);
    let overrides = read_tree_or_empty(overrides);
    deep_merge(&mut effective, &overrides);
    Snapshot {
        effective: Arc::new(effective),
        overrides: Arc::new(overrides),
    }
}

impl ConfigStore {
    /// Load both tiers; unreadable or unparsable sources become empty trees
    pub fn load(
        defaults_source: Box<dyn ConfigSource>,
        overrides_source: Box<dyn ConfigSource>,
    ) -> Self {
        let snapshot = build_snapshot(defaults_source.as_ref(), overrides_source.as_ref());
        info!(
            defaults = %defaults_source.describe(),
            overrides = %overrides_source.describe(),
            keys = snapshot.effective.len(),
            "configuration loaded"
        );

        Self {
            defaults_source,
            overrides_source,
            snapshot: RwLock::new(snapshot),
            writer: Mutex::new(()),
        }
    }

    /// Load the standard file layout
    pub fn load_paths(paths: &ConfigPaths) -> Self {
        Self::load(
            Box::new(paths.defaults_source()),
            Box::new(paths.local_source()),
        )
    }

    /// Current effective (defaults + overrides) tree
    pub fn effective(&self) -> Arc<ConfigTree> {
        Arc::clone(&self.read_snapshot().effective)
    }

    /// Current local overrides tree as last loaded or written by this process
    pub fn overrides(&self) -> Arc<ConfigTree> {
        Arc::clone(&self.read_snapshot().overrides)
    }

    fn read_snapshot(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        // Snapshots are only ever replaced whole, so a poisoned lock still guards a consistent value
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, next: Snapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Re-read both tiers from their sources and publish the result
    pub fn reload(&self) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let next = build_snapshot(self.defaults_source.as_ref(), self.overrides_source.as_ref());
        self.publish(next);
        info!("configuration reloaded");
    }

    /// Persist `setting` into the local overrides and merge it into the live view
    ///
    /// The overrides source is re-read first so edits made to it since start-up
    /// are kept. Nothing in memory changes unless the write succeeds.
    pub fn apply_setting(&self, setting: &ConfigTree) -> ConfigResult<()> {
        self.apply_setting_if(setting, |_| true).map(|_| ())
    }

    /// Like [`apply_setting`](Self::apply_setting), but only when `guard`
    /// accepts the effective tree rebuilt from the freshly read overrides
    ///
    /// The guard runs inside the writer section, so no other writer can change
    /// the configuration between the check and the write. Returns `false`
    /// without writing when the guard refuses.
    pub fn apply_setting_if<F>(&self, setting: &ConfigTree, guard: F) -> ConfigResult<bool>
    where
        F: FnOnce(&ConfigTree) -> bool,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut fresh = read_tree(self.overrides_source.as_ref())?;
        let mut current = ConfigTree::clone(&self.effective());
        deep_merge(&mut current, &fresh);
        if !guard(&current) {
            debug!(overrides = %self.overrides_source.describe(), "setting refused");
            return Ok(false);
        }

        deep_merge(&mut fresh, setting);
        let serialized = to_toml_string(&fresh)?;
        self.overrides_source
            .write(&serialized)
            .map_err(|error| ConfigError::Write {
                source_name: self.overrides_source.describe(),
                error,
            })?;

        deep_merge(&mut current, setting);
        self.publish(Snapshot {
            effective: Arc::new(current),
            overrides: Arc::new(fresh),
        });

        debug!(overrides = %self.overrides_source.describe(), "setting applied");
        Ok(true)
    }
}
