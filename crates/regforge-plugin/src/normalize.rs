// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default-export normalization applied before mocking.

use regforge_core::{PluginValue, ValueMap};

/// Error type returned by normalization hooks.
pub type NormalizeError = Box<dyn std::error::Error + Send + Sync>;

/// Rewrites a plugin's default export in place before it is validated and mocked.
pub trait Normalizer {
    /// Normalize `export`. A returned error fails the plugin's load.
    fn normalize(&self, export: &mut PluginValue) -> Result<(), NormalizeError>;
}

impl<F> Normalizer for F
where
    F: Fn(&mut PluginValue) -> Result<(), NormalizeError>,
{
    fn normalize(&self, export: &mut PluginValue) -> Result<(), NormalizeError> {
        self(export)
    }
}

/// Leaves every export untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNormalizer;

impl Normalizer for NoopNormalizer {
    fn normalize(&self, _export: &mut PluginValue) -> Result<(), NormalizeError> {
        Ok(())
    }
}

/// Fills absent fields with configured defaults.
///
/// Top-level defaults go into the export itself; nested defaults go into
/// every map child of the field named by `nested_key`. Present fields are
/// never overwritten, so applying the normalizer twice is the same as once.
#[derive(Debug, Clone, Default)]
pub struct ModuleDefaults {
    defaults: Vec<(String, PluginValue)>,
    nested_key: Option<String>,
    nested_defaults: Vec<(String, PluginValue)>,
}

impl ModuleDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level default.
    pub fn with_default(mut self, key: impl Into<String>, value: PluginValue) -> Self {
        self.defaults.push((key.into(), value));
        self
    }

    /// Set the field whose map children receive `defaults`.
    pub fn with_nested<I, K>(mut self, nested_key: impl Into<String>, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, PluginValue)>,
        K: Into<String>,
    {
        self.nested_key = Some(nested_key.into());
        self.nested_defaults = defaults.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    fn fill(map: &mut ValueMap, defaults: &[(String, PluginValue)]) {
        for (key, value) in defaults {
            if !map.contains_key(key) {
                map.insert(key.clone(), value.clone());
            }
        }
    }
}

impl Normalizer for ModuleDefaults {
    fn normalize(&self, export: &mut PluginValue) -> Result<(), NormalizeError> {
        let Some(map) = export.as_map_mut() else {
            return Ok(());
        };

        Self::fill(map, &self.defaults);

        let children = self
            .nested_key
            .as_deref()
            .and_then(|key| map.get_mut(key))
            .and_then(PluginValue::as_map_mut);
        if let Some(children) = children {
            for child in children.values_mut().filter_map(PluginValue::as_map_mut) {
                Self::fill(child, &self.nested_defaults);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export() -> PluginValue {
        let mut chain = ValueMap::new();
        chain.insert("fetch", PluginValue::Callable("fetch".into()));
        let mut adapter = ValueMap::new();
        adapter.insert("ethereum", chain.into());
        adapter.insert("meta", PluginValue::from("not a map"));
        let mut root = ValueMap::new();
        root.insert("adapter", adapter.into());
        root.into()
    }

    fn defaults() -> ModuleDefaults {
        ModuleDefaults::new()
            .with_default("version", PluginValue::from(1i64))
            .with_nested("adapter", [("runAtCurrTime", PluginValue::from(false))])
    }

    #[test]
    fn fills_missing_top_level_and_nested_fields() {
        let mut value = export();
        defaults().normalize(&mut value).unwrap();

        assert_eq!(value.get("version"), Some(&PluginValue::from(1i64)));
        let ethereum = value.get("adapter").unwrap().get("ethereum").unwrap();
        assert_eq!(ethereum.get("runAtCurrTime"), Some(&PluginValue::from(false)));
        // non-map children are left alone
        assert_eq!(
            value.get("adapter").unwrap().get("meta"),
            Some(&PluginValue::from("not a map"))
        );
    }

    #[test]
    fn present_fields_are_kept() {
        let mut value = export();
        value
            .as_map_mut()
            .unwrap()
            .insert("version", PluginValue::from(2i64));
        defaults().normalize(&mut value).unwrap();
        assert_eq!(value.get("version"), Some(&PluginValue::from(2i64)));
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut once = export();
        defaults().normalize(&mut once).unwrap();
        let mut twice = once.clone();
        defaults().normalize(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn non_map_export_is_untouched() {
        let mut value = PluginValue::Callable("handler".into());
        defaults().normalize(&mut value).unwrap();
        assert_eq!(value, PluginValue::Callable("handler".into()));
    }

    #[test]
    fn closures_are_normalizers() {
        let failing = |_: &mut PluginValue| -> Result<(), NormalizeError> { Err("bad shape".into()) };
        let mut value = export();
        let err = failing.normalize(&mut value).unwrap_err();
        assert_eq!(err.to_string(), "bad shape");
        assert!(NoopNormalizer.normalize(&mut value).is_ok());
    }
}
