// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `regforge list` command implementation.

use std::path::Path;

use regforge_config::RegforgeConfig;
use regforge_core::RegforgeError;
use regforge_plugin::{ListOptions, ListedEntry, PluginFamily};

/// Print `key<TAB>entry` for every plugin entry of `family`.
pub fn run_list(config: &RegforgeConfig, family: &str) -> Result<(), RegforgeError> {
    let entries = family_entries(config, family)?;
    tracing::debug!(family, count = entries.len(), "listed family");
    for entry in entries {
        println!("{}\t{}", entry.key, entry.name);
    }
    Ok(())
}

/// The entries a build would load for `family`, after exclusion.
pub fn family_entries(config: &RegforgeConfig, family: &str) -> Result<Vec<ListedEntry>, RegforgeError> {
    let families = &config.families;
    let layout = PluginFamily::new(
        family,
        Path::new(&families.source_dir),
        families.descriptor_dir.as_deref().map(Path::new),
        &families.package,
        &families.code_url,
        Path::new(&config.general.output_dir),
        &families.output_suffix,
    );
    let options = ListOptions::for_family(
        families.exclude.clone(),
        families.extensions.clone(),
        config.general.sort_entries,
    );
    layout.list_plugins(&options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regforge_test_utils::TestWorkspace;

    #[test]
    fn lists_keys_without_reserved_entries() {
        let ws = TestWorkspace::builder()
            .source_file("dexs", "b.ts")
            .source_file("dexs", "a.js")
            .source_file("dexs", "index.ts")
            .source_file("dexs", "README.md")
            .build()
            .unwrap();

        let entries = family_entries(&ws.config(), "dexs").unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn unknown_family_directory_is_an_error() {
        let ws = TestWorkspace::builder().build().unwrap();
        let err = family_entries(&ws.config(), "nope").unwrap_err();
        assert!(matches!(err, RegforgeError::DirectoryUnavailable { .. }));
    }
}
