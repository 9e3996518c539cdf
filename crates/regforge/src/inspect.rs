// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `regforge inspect` command implementation.
//!
//! Loads a single descriptor through the same checks a build applies and
//! prints the mocked module as it would appear in a registry.

use std::path::Path;

use regforge_config::RegforgeConfig;
use regforge_core::{DEFAULT_EXTENSIONS, PluginKey, PluginValue, RegforgeError};
use regforge_pipeline::normalizer_for;
use regforge_plugin::{FsModuleLoader, LoadRequest, load_plugin, mock};

/// Run the `regforge inspect` command.
pub fn run_inspect(config: &RegforgeConfig, descriptor: &Path) -> Result<(), RegforgeError> {
    let module = inspect_descriptor(config, descriptor)?;
    let text = serde_json::to_string_pretty(&module).map_err(|e| {
        RegforgeError::load(descriptor.display().to_string(), e.to_string())
    })?;
    println!("{text}");
    Ok(())
}

/// Load, normalize, depth-check, and mock one descriptor file.
pub fn inspect_descriptor(
    config: &RegforgeConfig,
    descriptor: &Path,
) -> Result<PluginValue, RegforgeError> {
    let module_path = descriptor.display().to_string();
    let entry = descriptor
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| RegforgeError::load(&module_path, "descriptor path has no file name"))?;
    let root = descriptor.parent().unwrap_or_else(|| Path::new("."));

    let key = PluginKey::from_entry(entry, DEFAULT_EXTENSIONS);
    let request = LoadRequest {
        family: "inspect",
        key: &key,
        entry,
        module_path: &module_path,
    };
    tracing::debug!(descriptor = %descriptor.display(), key = %key, "inspecting descriptor");
    let loader = FsModuleLoader::new(root);
    let normalizer = normalizer_for(&config.families.normalize);
    let module = load_plugin(
        &loader,
        normalizer.as_ref(),
        &request,
        config.families.max_value_depth,
    )?;
    Ok(mock(module))
}
