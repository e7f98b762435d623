// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Two-tier configuration engine.
//!
//! A read-only defaults document and a mutable local overrides document are
//! parsed from TOML into [`ConfigTree`]s and deep-merged into the effective
//! configuration. Runtime changes go through [`ConfigStore::apply_setting`],
//! which persists to the overrides document before touching the live view.

pub mod error;
pub mod extract;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod source;
pub mod store;
pub mod tree;

pub use error::{ConfigError, ConfigResult};
pub use merge::{deep_merge, fragment};
pub use paths::ConfigPaths;
pub use source::{ConfigSource, FileSource};
pub use store::ConfigStore;
pub use tree::{ConfigTree, ConfigValue, Scalar};
