// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration tree model
//!
//! A [`ConfigTree`] is a string-keyed mapping whose values are either scalars,
//! ordered sequences, or nested trees. Keeping the three shapes as explicit
//! variants lets merging tell tables and arrays apart with an exhaustive match.

use std::collections::BTreeMap;

/// Leaf value of the configuration tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(toml::value::Datetime),
}

/// A value stored under a key of a [`ConfigTree`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(Scalar),
    /// Sequences are atomic: merging replaces them wholesale
    Sequence(Vec<ConfigValue>),
    Tree(ConfigTree),
}

/// Recursively nested string-keyed configuration mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.entries.iter()
    }

    pub(crate) fn entry(&mut self, key: String) -> std::collections::btree_map::Entry<'_, String, ConfigValue> {
        self.entries.entry(key)
    }

    /// Nested tree stored under `key`, if that value is a tree
    pub fn subtree(&self, key: &str) -> Option<&ConfigTree> {
        self.get(key).and_then(ConfigValue::as_tree)
    }

    /// Follow `path` through nested trees
    pub fn lookup(&self, path: &[&str]) -> Option<&ConfigValue> {
        let (last, parents) = path.split_last()?;
        let mut cur = self;
        for segment in parents {
            cur = cur.subtree(segment)?;
        }
        cur.get(last)
    }
}

impl ConfigValue {
    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Scalar(Scalar::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(tree: ConfigTree) -> Self {
        ConfigValue::Tree(tree)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Scalar(Scalar::String(s))
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Scalar(Scalar::Boolean(b))
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Scalar(Scalar::Integer(i))
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// TOML is the on-disk representation; conversions are lossless in both directions.

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigValue::Scalar(Scalar::String(s)),
            toml::Value::Integer(i) => ConfigValue::Scalar(Scalar::Integer(i)),
            toml::Value::Float(f) => ConfigValue::Scalar(Scalar::Float(f)),
            toml::Value::Boolean(b) => ConfigValue::Scalar(Scalar::Boolean(b)),
            toml::Value::Datetime(d) => ConfigValue::Scalar(Scalar::Datetime(d)),
            toml::Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(table) => ConfigValue::Tree(ConfigTree::from(table)),
        }
    }
}

impl From<toml::Table> for ConfigTree {
    fn from(table: toml::Table) -> Self {
        table.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect()
    }
}

impl From<&ConfigValue> for toml::Value {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Scalar(Scalar::String(s)) => toml::Value::String(s.clone()),
            ConfigValue::Scalar(Scalar::Integer(i)) => toml::Value::Integer(*i),
            ConfigValue::Scalar(Scalar::Float(f)) => toml::Value::Float(*f),
            ConfigValue::Scalar(Scalar::Boolean(b)) => toml::Value::Boolean(*b),
            ConfigValue::Scalar(Scalar::Datetime(d)) => toml::Value::Datetime(*d),
            ConfigValue::Sequence(items) => {
                toml::Value::Array(items.iter().map(toml::Value::from).collect())
            }
            ConfigValue::Tree(tree) => toml::Value::Table(toml::Table::from(tree)),
        }
    }
}

impl From<&ConfigTree> for toml::Table {
    fn from(tree: &ConfigTree) -> Self {
        tree.iter().map(|(k, v)| (k.clone(), toml::Value::from(v))).collect()
    }
}
