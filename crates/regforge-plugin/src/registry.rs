// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered plugin registries.
//!
//! A [`Registry`] holds the mocked module of every plugin in one family; a
//! [`RequireMap`] holds plain key-to-module-path pairs. Both keep entries in
//! insertion order, and re-inserting a key replaces its value while keeping
//! the position where the key was first seen.

use std::collections::HashMap;

use regforge_core::{PluginKey, PluginValue};

/// A single plugin in a family registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    /// Normalized plugin key.
    pub key: PluginKey,
    /// Logical module path, e.g. `@pkg/dexs/alpha`.
    pub module_file_path: String,
    /// The mocked module document, `default` and any sibling exports.
    pub module: PluginValue,
    /// Browsable source link for the raw entry.
    pub code_path: String,
}

/// Registry of mocked plugin modules for one family.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    family: String,
    entries: Vec<RegistryEntry>,
    index: HashMap<PluginKey, usize>,
}

impl Registry {
    /// Create an empty registry for `family`.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Family this registry was built for.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Insert an entry. A duplicate key replaces the earlier entry in place
    /// and the replaced entry is returned.
    pub fn insert(&mut self, entry: RegistryEntry) -> Option<RegistryEntry> {
        match self.index.get(&entry.key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], entry)),
            None => {
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Get an entry by key.
    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.index
            .get(&PluginKey::from(key))
            .map(|&position| &self.entries[position])
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &PluginKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered map from key to module path, emitted as `require(...)` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequireMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RequireMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the path for `key`, returning the previous path.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<String>) -> Option<String> {
        let key = key.into();
        let path = path.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, path)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, path));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// `(key, path)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regforge_core::ValueMap;

    fn entry(key: &str, marker: &str) -> RegistryEntry {
        let mut module = ValueMap::new();
        module.insert("default", PluginValue::from(marker));
        RegistryEntry {
            key: PluginKey::from(key),
            module_file_path: format!("@pkg/dexs/{key}"),
            module: module.into(),
            code_path: format!("https://example.test/dexs/{key}.ts"),
        }
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let mut registry = Registry::new("dexs");
        assert!(registry.insert(entry("alpha", "a")).is_none());

        let found = registry.get("alpha").unwrap();
        assert_eq!(found.module_file_path, "@pkg/dexs/alpha");
        assert_eq!(registry.family(), "dexs");
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut registry = Registry::new("fees");
        for key in ["zebra", "alpha", "middle"] {
            registry.insert(entry(key, key));
        }

        let keys: Vec<&str> = registry.keys().map(PluginKey::as_str).collect();
        assert_eq!(keys, vec!["zebra", "alpha", "middle"]);
    }

    #[test]
    fn duplicate_key_last_write_wins_at_first_position() {
        let mut registry = Registry::new("dexs");
        registry.insert(entry("foo", "first"));
        registry.insert(entry("bar", "bar"));
        let replaced = registry.insert(entry("foo", "second")).unwrap();

        assert_eq!(replaced.module.get("default"), Some(&PluginValue::from("first")));
        assert_eq!(registry.len(), 2);
        let keys: Vec<&str> = registry.keys().map(PluginKey::as_str).collect();
        assert_eq!(keys, vec!["foo", "bar"]);
        assert_eq!(
            registry.get("foo").unwrap().module.get("default"),
            Some(&PluginValue::from("second"))
        );
    }

    #[test]
    fn require_map_replaces_in_place() {
        let mut map = RequireMap::new();
        assert!(map.is_empty());
        map.insert("aave", "@pkg/aave");
        map.insert("compound", "@pkg/compound");
        assert_eq!(map.insert("aave", "@pkg/aave-v3"), Some("@pkg/aave".to_string()));

        let pairs: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(pairs, vec![("aave", "@pkg/aave-v3"), ("compound", "@pkg/compound")]);
        assert_eq!(map.get("compound"), Some("@pkg/compound"));
        assert_eq!(map.len(), 2);
    }
}
