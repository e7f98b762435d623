// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TOML loading and serialization

use crate::error::{ConfigError, ConfigResult};
use crate::source::ConfigSource;
use crate::tree::ConfigTree;

/// Parse a TOML document into a configuration tree
pub fn parse_toml(toml_str: &str) -> Result<ConfigTree, toml::de::Error> {
    let table: toml::Table = toml::from_str(toml_str)?;
    Ok(ConfigTree::from(table))
}

/// Serialize a configuration tree as a TOML document
pub fn to_toml_string(tree: &ConfigTree) -> ConfigResult<String> {
    Ok(toml::to_string(&toml::Table::from(tree))?)
}

/// Read and parse a source; an absent document is an empty tree
pub fn read_tree(source: &dyn ConfigSource) -> ConfigResult<ConfigTree> {
    let raw = source.read().map_err(|error| ConfigError::Read {
        source_name: source.describe(),
        error,
    })?;

    match raw {
        Some(raw) => parse_toml(&raw).map_err(|error| ConfigError::Parse {
            source_name: source.describe(),
            error,
        }),
        None => Ok(ConfigTree::new()),
    }
}

/// Read a source, substituting an empty tree for any failure
///
/// Failures are reported through `tracing` and never propagated.
pub fn read_tree_or_empty(source: &dyn ConfigSource) -> ConfigTree {
    match read_tree(source) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(error = %err, "continuing with an empty configuration");
            ConfigTree::new()
        }
    }
}
