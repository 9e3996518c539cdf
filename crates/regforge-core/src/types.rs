// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the lister, loader, emitter, and pipeline driver.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Extensions stripped from directory entry names by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "js", "md", "json", "toml"];

/// Normalized identifier of a plugin within one family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginKey(pub String);

impl PluginKey {
    /// Derive a key from a directory entry name.
    ///
    /// The entry is split on `.`; the last segment is dropped when there is
    /// more than one segment and it is one of `extensions`. `adapter.ts`
    /// becomes `adapter`, `a.b.ts` becomes `a.b`, and `adapter` or
    /// `.gitkeep` stay unchanged.
    pub fn from_entry<S: AsRef<str>>(entry: &str, extensions: &[S]) -> Self {
        let mut segments: Vec<&str> = entry.split('.').collect();
        if segments.len() > 1 {
            let last = segments[segments.len() - 1];
            if extensions.iter().any(|ext| ext.as_ref() == last) {
                segments.pop();
            }
        }
        PluginKey(segments.join("."))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PluginKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginKey {
    fn from(s: &str) -> Self {
        PluginKey(s.to_string())
    }
}

/// How much work a failure invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorScope {
    /// A single plugin key; siblings continue.
    Key,
    /// One family or one require-map pipeline; other pipelines continue.
    Family,
    /// The whole run; already-written files stay in place.
    Run,
}

/// Terminal state of one plugin key within a family build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum KeyState {
    Pending,
    Succeeded,
    Failed,
}
