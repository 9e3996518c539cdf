// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed value model for plugin descriptors.
//!
//! Every plugin module is decoded into a [`PluginValue`] tree before it is
//! validated, normalized, or mocked. Maps keep their insertion order so the
//! generated registries mirror the descriptor layout exactly.
//!
//! Descriptor documents (JSON or TOML) mark a callable with a single-key map:
//!
//! ```json
//! { "fetch": { "$fn": "fetchVolume" } }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Map key that marks a callable in descriptor documents.
pub const CALLABLE_MARKER: &str = "$fn";

/// Key the `toml` crate uses to carry a datetime through serde.
const TOML_DATETIME_MARKER: &str = "$__toml_private_datetime";

/// A decoded plugin descriptor value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PluginValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<PluginValue>),
    Map(ValueMap),
    /// A function exported by the plugin, identified by name.
    Callable(String),
}

impl PluginValue {
    /// Returns true for `Callable` values.
    pub fn is_callable(&self) -> bool {
        matches!(self, PluginValue::Callable(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PluginValue::Null)
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            PluginValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            PluginValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PluginValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&PluginValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// True if any node of the tree is a `Callable`.
    pub fn contains_callable(&self) -> bool {
        match self {
            PluginValue::Callable(_) => true,
            PluginValue::List(items) => items.iter().any(PluginValue::contains_callable),
            PluginValue::Map(map) => map.values().any(PluginValue::contains_callable),
            _ => false,
        }
    }

    /// Nesting depth of the tree. Scalars and empty containers have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            PluginValue::List(items) => 1 + items.iter().map(PluginValue::depth).max().unwrap_or(0),
            PluginValue::Map(map) => 1 + map.values().map(PluginValue::depth).max().unwrap_or(0),
            _ => 1,
        }
    }

    /// True when both trees have the same variant at every node and maps
    /// carry the same keys in the same order. Scalar contents are ignored.
    pub fn same_shape(&self, other: &PluginValue) -> bool {
        match (self, other) {
            (PluginValue::List(a), PluginValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (PluginValue::Map(a), PluginValue::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_shape(vb))
            }
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }

    /// Compact JSON text for this value.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&str> for PluginValue {
    fn from(s: &str) -> Self {
        PluginValue::String(s.to_string())
    }
}

impl From<String> for PluginValue {
    fn from(s: String) -> Self {
        PluginValue::String(s)
    }
}

impl From<bool> for PluginValue {
    fn from(b: bool) -> Self {
        PluginValue::Bool(b)
    }
}

impl From<i64> for PluginValue {
    fn from(n: i64) -> Self {
        PluginValue::Number(n.into())
    }
}

impl From<ValueMap> for PluginValue {
    fn from(map: ValueMap) -> Self {
        PluginValue::Map(map)
    }
}

impl From<Vec<PluginValue>> for PluginValue {
    fn from(items: Vec<PluginValue>) -> Self {
        PluginValue::List(items)
    }
}

/// Insertion-ordered string-keyed map.
///
/// Inserting an existing key replaces its value in place, keeping the
/// position of the first occurrence. Lookups go through a key index.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(String, PluginValue)>,
    index: HashMap<String, usize>,
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: PluginValue) -> Option<PluginValue> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PluginValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PluginValue> {
        let position = *self.index.get(key)?;
        Some(&mut self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove a key, shifting later entries down one position.
    pub fn remove(&mut self, key: &str) -> Option<PluginValue> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &PluginValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut PluginValue> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PluginValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, PluginValue)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, PluginValue)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for PluginValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PluginValue::Null => serializer.serialize_unit(),
            PluginValue::Bool(b) => serializer.serialize_bool(*b),
            PluginValue::Number(n) => n.serialize(serializer),
            PluginValue::String(s) => serializer.serialize_str(s),
            PluginValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            PluginValue::Map(map) => map.serialize(serializer),
            PluginValue::Callable(name) => {
                let mut out = serializer.serialize_map(Some(1))?;
                out.serialize_entry(CALLABLE_MARKER, name)?;
                out.end()
            }
        }
    }
}

impl Serialize for ValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

impl<'de> Deserialize<'de> for PluginValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PluginValueVisitor)
    }
}

struct PluginValueVisitor;

impl<'de> Visitor<'de> for PluginValueVisitor {
    type Value = PluginValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a plugin descriptor value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<PluginValue, E> {
        Ok(PluginValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PluginValue, E> {
        Ok(PluginValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PluginValue, E> {
        Ok(PluginValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<PluginValue, E> {
        serde_json::Number::from_f64(v)
            .map(PluginValue::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PluginValue, E> {
        Ok(PluginValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<PluginValue, E> {
        Ok(PluginValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<PluginValue, E> {
        Ok(PluginValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<PluginValue, E> {
        Ok(PluginValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<PluginValue, D::Error> {
        PluginValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PluginValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(PluginValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PluginValue, A::Error> {
        let mut map = ValueMap::new();
        while let Some((key, value)) = access.next_entry::<String, PluginValue>()? {
            map.insert(key, value);
        }
        if map.len() == 1 {
            if let Some(PluginValue::String(name)) = map.get(CALLABLE_MARKER) {
                return Ok(PluginValue::Callable(name.clone()));
            }
            // TOML dates, times, and datetimes are kept as their RFC 3339 text
            if let Some(PluginValue::String(text)) = map.get(TOML_DATETIME_MARKER) {
                return Ok(PluginValue::String(text.clone()));
            }
        }
        Ok(PluginValue::Map(map))
    }
}
