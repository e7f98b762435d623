// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tree merging functionality

use crate::tree::{ConfigTree, ConfigValue};

/// Merge `patch` into `base` in place and return `base`
///
/// Trees are merged recursively, scalars and sequences replace the base value.
/// A tree in `patch` landing on a non-tree slot turns that slot into a tree.
pub fn deep_merge<'a>(base: &'a mut ConfigTree, patch: &ConfigTree) -> &'a mut ConfigTree {
    for (key, value) in patch.iter() {
        match value {
            ConfigValue::Tree(sub) => {
                let slot = base
                    .entry(key.clone())
                    .or_insert_with(|| ConfigValue::Tree(ConfigTree::new()));
                if !matches!(slot, ConfigValue::Tree(_)) {
                    *slot = ConfigValue::Tree(ConfigTree::new());
                }
                if let ConfigValue::Tree(inner) = slot {
                    deep_merge(inner, sub);
                }
            }
            // Policy: sequences are replaced wholesale
            ConfigValue::Sequence(_) | ConfigValue::Scalar(_) => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
    base
}

/// Build a tree holding `value` at the nested key `path`
///
/// Path segments are taken literally, so keys containing dots stay intact.
pub fn fragment(path: &[&str], value: impl Into<ConfigValue>) -> ConfigTree {
    let Some((last, parents)) = path.split_last() else {
        return ConfigTree::new();
    };

    let mut tree = ConfigTree::new();
    tree.insert(*last, value);
    for segment in parents.iter().rev() {
        let mut outer = ConfigTree::new();
        outer.insert(*segment, tree);
        tree = outer;
    }
    tree
}
