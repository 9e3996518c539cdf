// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat require maps: directory listings and merged catalogs.
//!
//! No module is loaded or validated here; each key simply maps to the
//! logical path a consumer should `require`.

use std::path::Path;

use regforge_config::model::RequireMapConfig;
use regforge_core::RegforgeError;
use regforge_plugin::{ListOptions, RequireMap, list_entries};

/// Source-file extensions stripped from require-map keys. Descriptor formats
/// are not included, so `foo.json` keeps its full name.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "js", "md"];

/// Map every entry of a require-map directory to `<package>/<raw entry>`.
///
/// Keys are the raw entry names, or the entry names with one of
/// [`SOURCE_EXTENSIONS`] stripped when `strip_extensions` is set.
pub fn directory_require_map(
    config: &RequireMapConfig,
    sort: bool,
) -> Result<RequireMap, RegforgeError> {
    let extensions = if config.strip_extensions {
        SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    };
    let options = ListOptions {
        directories_only: false,
        exclude: config.exclude.clone(),
        extensions,
        sort,
    };

    let mut map = RequireMap::new();
    for entry in list_entries(Path::new(&config.source_dir), &options)? {
        let path = join_module(&config.package, &entry.name);
        if let Some(previous) = map.insert(entry.key.as_str(), path) {
            tracing::warn!(
                key = %entry.key,
                replaced = %previous,
                "duplicate require-map key, later entry replaces earlier one"
            );
        }
    }
    Ok(map)
}

/// Map merged catalog module identifiers to `<package>/<module>`.
pub fn catalog_require_map(modules: &[String], package: &str) -> RequireMap {
    let mut map = RequireMap::new();
    for module in modules {
        map.insert(module.as_str(), join_module(package, module));
    }
    map
}

fn join_module(package: &str, name: &str) -> String {
    format!("{}/{}", package.trim_end_matches('/'), name)
}
