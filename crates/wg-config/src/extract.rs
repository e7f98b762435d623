// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed extraction utilities for distributed configuration access

use crate::error::{ConfigError, ConfigResult};
use crate::tree::ConfigTree;
use serde::de::DeserializeOwned;

/// Extract the entire tree as a typed value
pub fn get<T: DeserializeOwned>(root: &ConfigTree) -> ConfigResult<T> {
    let value = toml::Value::Table(toml::Table::from(root));
    serde_path_to_error::deserialize(value).map_err(|e| ConfigError::Extract {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}
