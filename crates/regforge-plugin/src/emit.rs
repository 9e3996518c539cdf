// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generated-file rendering and writing.
//!
//! Rendering is pure and returns the full file text. Every string literal in
//! the output is produced by `serde_json`, so keys, paths, and URLs are always
//! escaped JSON strings.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use regforge_core::{PluginValue, RegforgeError, ValueMap};

use crate::registry::{Registry, RequireMap};

/// First line of every generated TypeScript file.
pub const GENERATED_HEADER: &str = "// Code generated by regforge. DO NOT EDIT.";

/// Type annotation used for a family registry file.
#[derive(Debug, Clone, Copy)]
pub struct RegistryTemplate<'a> {
    /// Type of each plugin's default export, e.g. `Adapter`.
    pub type_name: &'a str,
    /// Module `type_name` is imported from.
    pub type_module: &'a str,
}

/// JSON string literal for `s`.
fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Render a family registry module.
pub fn render_registry(
    registry: &Registry,
    template: &RegistryTemplate<'_>,
) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    let _ = writeln!(out, "{GENERATED_HEADER}");
    let _ = writeln!(
        out,
        "import {{ {} }} from {};",
        template.type_name,
        quote(template.type_module)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "export default {{");
    for entry in registry.iter() {
        let _ = writeln!(
            out,
            "  {}: {{ moduleFilePath: {}, module: {}, codePath: {} }},",
            quote(entry.key.as_str()),
            quote(&entry.module_file_path),
            serde_json::to_string(&entry.module)?,
            quote(&entry.code_path),
        );
    }
    let _ = writeln!(
        out,
        "}} as any as {{[key:string]: {{ moduleFilePath: string, module: {{ default: {} }}, codePath: string }} }}",
        template.type_name
    );
    Ok(out)
}

/// Render a flat `require(...)` map.
pub fn render_require_map(map: &RequireMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{GENERATED_HEADER}");
    let _ = writeln!(out);
    let _ = writeln!(out, "export default {{");
    for (key, path) in map.iter() {
        let _ = writeln!(out, "  {}: require({}),", quote(key), quote(path));
    }
    let _ = writeln!(out, "}}");
    out
}

/// Render the key-to-path map as a pretty-printed JSON object.
pub fn render_artifact_map(map: &RequireMap) -> Result<String, serde_json::Error> {
    let object: ValueMap = map
        .iter()
        .map(|(key, path)| (key, PluginValue::from(path)))
        .collect();
    let mut text = serde_json::to_string_pretty(&PluginValue::Map(object))?;
    text.push('\n');
    Ok(text)
}

/// Write `contents` to `path`, creating parent directories and replacing
/// any existing file.
pub fn write_generated(path: &Path, contents: &str) -> Result<(), RegforgeError> {
    let emit_failure = |source: std::io::Error| RegforgeError::EmitFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(emit_failure)?;
    }
    fs::write(path, contents).map_err(emit_failure)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote generated file");
    Ok(())
}

/// Render and write a family registry.
pub fn emit_registry(
    registry: &Registry,
    template: &RegistryTemplate<'_>,
    path: &Path,
) -> Result<(), RegforgeError> {
    let text = render_registry(registry, template).map_err(|e| RegforgeError::EmitFailure {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    write_generated(path, &text)
}
