// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

/// Decoded caller identity supplied by the authentication layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    /// Role or category; looked up in a tenant's access list
    pub level: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: level.into(),
        }
    }
}
