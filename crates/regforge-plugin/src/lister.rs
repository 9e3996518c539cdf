// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory listing with reserved-name filtering.
//!
//! Entries are returned in the order the filesystem reports them unless the
//! caller asks for a lexical sort. Nothing is recursed into.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regforge_core::{PluginKey, RegforgeError};

use crate::loader::is_descriptor_file;

/// Options controlling a single directory listing.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Keep only entries that are directories (symlinks are followed).
    pub directories_only: bool,
    /// Reserved names. An entry is dropped when its raw name or its
    /// normalized key matches one of these.
    pub exclude: Vec<String>,
    /// Extensions stripped when deriving keys.
    pub extensions: Vec<String>,
    /// Sort entries lexically by name.
    pub sort: bool,
}

impl ListOptions {
    /// Options for a plugin family listing.
    pub fn for_family(exclude: Vec<String>, extensions: Vec<String>, sort: bool) -> Self {
        Self {
            directories_only: false,
            exclude,
            extensions,
            sort,
        }
    }

    fn is_excluded(&self, name: &str, key: &PluginKey) -> bool {
        self.exclude
            .iter()
            .any(|reserved| reserved == name || reserved == key.as_str())
    }
}

/// A directory entry together with the plugin key derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// Raw entry name as reported by the filesystem.
    pub name: String,
    /// Entry name with a recognized extension stripped.
    pub key: PluginKey,
}

/// List the immediate entries of `dir`, applying `options`.
pub fn list_entries(dir: &Path, options: &ListOptions) -> Result<Vec<ListedEntry>, RegforgeError> {
    let unavailable = |source: std::io::Error| RegforgeError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!(
                    dir = %dir.display(),
                    entry = ?raw,
                    "skipping entry with non UTF-8 name"
                );
                continue;
            }
        };

        if options.directories_only && !entry.path().is_dir() {
            continue;
        }

        let key = PluginKey::from_entry(&name, &options.extensions);
        if options.is_excluded(&name, &key) {
            tracing::trace!(dir = %dir.display(), entry = %name, "excluded reserved entry");
            continue;
        }

        entries.push(ListedEntry { name, key });
    }

    if options.sort {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    tracing::debug!(dir = %dir.display(), count = entries.len(), "listed directory");
    Ok(entries)
}

/// Drop descriptor files whose key also belongs to a plugin source entry.
///
/// When descriptors sit beside the sources they describe, `alpha.json` and
/// `alpha.ts` name the same plugin; only the source entry is kept. A
/// descriptor with no source sibling stays a plugin of its own.
pub fn drop_shadowed_descriptors(entries: Vec<ListedEntry>) -> Vec<ListedEntry> {
    let sourced: HashSet<PluginKey> = entries
        .iter()
        .filter(|e| !is_descriptor_file(&e.name))
        .map(|e| e.key.clone())
        .collect();
    entries
        .into_iter()
        .filter(|e| !is_descriptor_file(&e.name) || !sourced.contains(&e.key))
        .collect()
}
