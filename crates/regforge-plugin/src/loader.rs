// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin module loading.
//!
//! A [`ModuleLoader`] resolves a logical module path to a decoded module
//! value. [`FsModuleLoader`] reads JSON or TOML descriptors from disk.
//! [`load_plugin`] runs a loader and checks the result: the module must
//! export a non-null `default`, which is normalized in place, and the whole
//! module is then bounded in depth.

use std::fs;
use std::path::{Path, PathBuf};

use regforge_core::{PluginKey, PluginValue, RegforgeError};

use crate::normalize::Normalizer;

/// Everything a loader may use to locate one plugin module.
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    /// Family (or require-map) the plugin belongs to.
    pub family: &'a str,
    /// Normalized plugin key.
    pub key: &'a PluginKey,
    /// Raw directory entry name.
    pub entry: &'a str,
    /// Logical module path, used in error messages.
    pub module_path: &'a str,
}

/// Resolves plugin modules to values.
pub trait ModuleLoader {
    /// Load the whole module, including its `default` field.
    fn load(&self, request: &LoadRequest<'_>) -> Result<PluginValue, RegforgeError>;
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for &L {
    fn load(&self, request: &LoadRequest<'_>) -> Result<PluginValue, RegforgeError> {
        (**self).load(request)
    }
}

/// Descriptor format, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DescriptorFormat {
    Json,
    Toml,
}

impl DescriptorFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Whether `name` is a descriptor file (`.json` or `.toml`).
pub fn is_descriptor_file(name: &str) -> bool {
    DescriptorFormat::from_path(Path::new(name)).is_some()
}

/// Loads descriptor files from a per-family directory.
///
/// Candidates are tried in order: the raw entry when it is itself a JSON or
/// TOML file, then `<key>.json`, `<key>.toml`, `<entry>/index.json`, and
/// `<entry>/index.toml`.
#[derive(Debug, Clone)]
pub struct FsModuleLoader {
    root: PathBuf,
}

impl FsModuleLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, request: &LoadRequest<'_>) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(5);
        let raw = self.root.join(request.entry);
        if DescriptorFormat::from_path(&raw).is_some() {
            candidates.push(raw);
        }
        candidates.push(self.root.join(format!("{}.json", request.key)));
        candidates.push(self.root.join(format!("{}.toml", request.key)));
        let dir = self.root.join(request.entry);
        candidates.push(dir.join("index.json"));
        candidates.push(dir.join("index.toml"));
        candidates
    }

    fn decode(path: &Path, module_path: &str) -> Result<PluginValue, RegforgeError> {
        let text = fs::read_to_string(path).map_err(|e| RegforgeError::LoadFailure {
            module_path: module_path.to_string(),
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        let parse_failure = |e: Box<dyn std::error::Error + Send + Sync>| RegforgeError::LoadFailure {
            module_path: module_path.to_string(),
            message: format!("cannot parse {}: {e}", path.display()),
            source: Some(e),
        };

        match DescriptorFormat::from_path(path) {
            Some(DescriptorFormat::Json) => {
                serde_json::from_str(&text).map_err(|e| parse_failure(Box::new(e)))
            }
            Some(DescriptorFormat::Toml) => {
                toml::from_str(&text).map_err(|e| parse_failure(Box::new(e)))
            }
            None => Err(RegforgeError::load(
                module_path,
                format!("unsupported descriptor {}", path.display()),
            )),
        }
    }
}

impl ModuleLoader for FsModuleLoader {
    fn load(&self, request: &LoadRequest<'_>) -> Result<PluginValue, RegforgeError> {
        let found = self.candidates(request).into_iter().find(|path| path.is_file());
        match found {
            Some(path) => {
                tracing::trace!(
                    module = request.module_path,
                    descriptor = %path.display(),
                    "decoding descriptor"
                );
                Self::decode(&path, request.module_path)
            }
            None => Err(RegforgeError::load(
                request.module_path,
                format!("no descriptor for `{}` under {}", request.entry, self.root.display()),
            )),
        }
    }
}

/// Load a plugin module and check its default export.
///
/// Returns the whole module document, sibling exports included, with
/// `default` normalized in place. Fails with `MissingDefaultExport` when the
/// module has no `default` or it is null, with `LoadFailure` when loading or
/// normalization fails, and with `ValueTooDeep` when the module nests deeper
/// than `max_depth`.
pub fn load_plugin(
    loader: &dyn ModuleLoader,
    normalizer: &dyn Normalizer,
    request: &LoadRequest<'_>,
    max_depth: usize,
) -> Result<PluginValue, RegforgeError> {
    let mut module = loader.load(request)?;

    let export = match module.as_map_mut().and_then(|map| map.get_mut("default")) {
        Some(export) if !export.is_null() => export,
        _ => {
            return Err(RegforgeError::MissingDefaultExport {
                module_path: request.module_path.to_string(),
            });
        }
    };

    normalizer
        .normalize(export)
        .map_err(|e| RegforgeError::LoadFailure {
            module_path: request.module_path.to_string(),
            message: format!("normalization failed: {e}"),
            source: Some(e),
        })?;

    let depth = module.depth();
    if depth > max_depth {
        return Err(RegforgeError::ValueTooDeep {
            module_path: request.module_path.to_string(),
            depth,
            limit: max_depth,
        });
    }

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{ModuleDefaults, NoopNormalizer, NormalizeError};

    fn request<'a>(key: &'a PluginKey, entry: &'a str, module_path: &'a str) -> LoadRequest<'a> {
        LoadRequest {
            family: "dexs",
            key,
            entry,
            module_path,
        }
    }

    fn default_of(module: &PluginValue) -> &PluginValue {
        module.get("default").unwrap()
    }

    fn write(root: &Path, name: &str, contents: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn loads_json_descriptor_by_key() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "alpha.json",
            r#"{"default": {"fetch": {"$fn": "fetch"}, "start": 1690000000}}"#,
        );

        let key = PluginKey::from("alpha");
        let loader = FsModuleLoader::new(tmp.path());
        let module = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "alpha.ts", "@pkg/dexs/alpha"),
            64,
        )
        .unwrap();

        assert_eq!(default_of(&module).get("fetch"), Some(&PluginValue::Callable("fetch".into())));
    }

    #[test]
    fn loads_toml_index_inside_directory_entry() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "beta/index.toml",
            "[default]\nmethodology = \"volume\"\n[default.fetch]\n\"$fn\" = \"fetch\"\n",
        );

        let key = PluginKey::from("beta");
        let loader = FsModuleLoader::new(tmp.path());
        let module = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "beta", "@pkg/dexs/beta"),
            64,
        )
        .unwrap();

        assert_eq!(default_of(&module).get("methodology"), Some(&PluginValue::from("volume")));
        assert!(default_of(&module).get("fetch").unwrap().is_callable());
    }

    #[test]
    fn raw_descriptor_entry_is_loaded_directly() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "gamma.json", r#"{"default": {"name": "gamma"}}"#);

        // key keeps the extension when json is not a recognized extension
        let key = PluginKey::from("gamma.json");
        let loader = FsModuleLoader::new(tmp.path());
        let module = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "gamma.json", "@pkg/dexs/gamma.json"),
            64,
        )
        .unwrap();
        assert_eq!(default_of(&module).get("name"), Some(&PluginValue::from("gamma")));
    }

    #[test]
    fn missing_default_export_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "beta.json", r#"{"named": 1}"#);
        write(tmp.path(), "delta.json", r#"{"default": null}"#);
        let loader = FsModuleLoader::new(tmp.path());

        for name in ["beta", "delta"] {
            let key = PluginKey::from(name);
            let module_path = format!("@pkg/dexs/{name}");
            let err = load_plugin(
                &loader,
                &NoopNormalizer,
                &request(&key, name, &module_path),
                64,
            )
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("module @pkg/dexs/{name} does not have a default export")
            );
        }
    }

    #[test]
    fn absent_descriptor_is_load_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let key = PluginKey::from("ghost");
        let loader = FsModuleLoader::new(tmp.path());
        let err = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "ghost.ts", "@pkg/dexs/ghost"),
            64,
        )
        .unwrap_err();
        assert!(matches!(err, RegforgeError::LoadFailure { .. }));
    }

    #[test]
    fn malformed_descriptor_is_load_failure() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "broken.json", "{ not json");
        let key = PluginKey::from("broken");
        let loader = FsModuleLoader::new(tmp.path());
        let err = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "broken.ts", "@pkg/dexs/broken"),
            64,
        )
        .unwrap_err();
        match err {
            RegforgeError::LoadFailure { message, source, .. } => {
                assert!(message.contains("cannot parse"));
                assert!(source.is_some());
            }
            other => panic!("expected LoadFailure, got {other:?}"),
        }
    }

    #[test]
    fn normalizer_runs_before_depth_check() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "alpha.json", r#"{"default": {"adapter": {}}}"#);
        let key = PluginKey::from("alpha");
        let loader = FsModuleLoader::new(tmp.path());
        let defaults = ModuleDefaults::new().with_default("version", PluginValue::from(1i64));

        let module = load_plugin(
            &loader,
            &defaults,
            &request(&key, "alpha.ts", "@pkg/dexs/alpha"),
            64,
        )
        .unwrap();
        assert_eq!(default_of(&module).get("version"), Some(&PluginValue::from(1i64)));
    }

    #[test]
    fn normalizer_failure_is_load_failure() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "alpha.json", r#"{"default": {}}"#);
        let key = PluginKey::from("alpha");
        let loader = FsModuleLoader::new(tmp.path());
        let reject = |_: &mut PluginValue| -> Result<(), NormalizeError> { Err("no adapter".into()) };

        let err = load_plugin(
            &loader,
            &reject,
            &request(&key, "alpha.ts", "@pkg/dexs/alpha"),
            64,
        )
        .unwrap_err();
        assert!(err.to_string().contains("normalization failed: no adapter"));
    }

    #[test]
    fn exports_deeper_than_limit_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "deep.json", r#"{"default": {"a": {"b": {"c": 1}}}}"#);
        let key = PluginKey::from("deep");
        let loader = FsModuleLoader::new(tmp.path());

        let err = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "deep.ts", "@pkg/dexs/deep"),
            4,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegforgeError::ValueTooDeep { depth: 5, limit: 4, .. }
        ));
    }

    #[test]
    fn sibling_exports_are_kept() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "alpha.json",
            r#"{"default": {"name": "Alpha"}, "config": {"chains": ["eth"], "hook": {"$fn": "h"}}}"#,
        );
        let key = PluginKey::from("alpha");
        let loader = FsModuleLoader::new(tmp.path());
        let defaults = ModuleDefaults::new().with_default("version", PluginValue::from(1i64));

        let module = load_plugin(
            &loader,
            &defaults,
            &request(&key, "alpha.ts", "@pkg/dexs/alpha"),
            64,
        )
        .unwrap();

        let keys: Vec<&str> = module.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["default", "config"]);
        assert_eq!(default_of(&module).get("version"), Some(&PluginValue::from(1i64)));
        // only the default export is normalized
        let config = module.get("config").unwrap();
        assert_eq!(config.get("version"), None);
        assert_eq!(config.get("hook"), Some(&PluginValue::Callable("h".into())));
    }

    #[test]
    fn non_map_module_has_no_default_export() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "list.json", "[1, 2]");
        let key = PluginKey::from("list");
        let loader = FsModuleLoader::new(tmp.path());
        let err = load_plugin(
            &loader,
            &NoopNormalizer,
            &request(&key, "list.ts", "@pkg/dexs/list"),
            64,
        )
        .unwrap_err();
        assert!(matches!(err, RegforgeError::MissingDefaultExport { .. }));
    }
}
