// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration error types

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures while reading, parsing or persisting a configuration source
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config source {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("parsing config source {source_name}: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: toml::de::Error,
    },

    #[error("serializing configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("writing config source {source_name}: {error}")]
    Write {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("config path '{path}' extraction failed: {message}")]
    Extract { path: String, message: String },
}
