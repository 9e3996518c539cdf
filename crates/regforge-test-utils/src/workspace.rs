// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary plugin trees for end-to-end tests.
//!
//! `TestWorkspace` lays out a miniature adapters monorepo in a temp
//! directory and hands back a `RegforgeConfig` pointing at it:
//!
//! ```text
//! <root>/dimension-adapters/<family>/<entry>   source stubs
//! <root>/descriptors/<family>/<key>.json       plugin descriptors
//! <root>/liquidations/<entry>
//! <root>/emissions/<entry>
//! <root>/catalogs/{protocols,treasuries,entities}.json
//! <root>/out/                                  generated files
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regforge_config::RegforgeConfig;
use regforge_core::{DEFAULT_EXTENSIONS, PluginKey, PluginValue, ValueMap};
use tempfile::TempDir;

/// Which catalog file a fixture record list goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Protocols,
    Treasuries,
    Entities,
}

impl CatalogKind {
    fn file_name(self) -> &'static str {
        match self {
            CatalogKind::Protocols => "protocols.json",
            CatalogKind::Treasuries => "treasuries.json",
            CatalogKind::Entities => "entities.json",
        }
    }
}

/// Builder collecting fixture files before they are written.
#[derive(Default)]
pub struct TestWorkspaceBuilder {
    files: Vec<(PathBuf, String)>,
    families: Vec<String>,
    liquidations: bool,
    emissions: bool,
    catalogs: bool,
}

impl TestWorkspaceBuilder {
    /// Add a plugin source entry plus its descriptor.
    ///
    /// `export` of `None` writes a module without a default export.
    pub fn plugin(mut self, family: &str, entry: &str, export: Option<PluginValue>) -> Self {
        self.register_family(family);
        self.files.push((
            Path::new("dimension-adapters").join(family).join(entry),
            "// source stub\n".to_string(),
        ));

        let key = PluginKey::from_entry(entry, DEFAULT_EXTENSIONS);
        let mut module = ValueMap::new();
        if let Some(export) = export {
            module.insert("default", export);
        }
        let document =
            serde_json::to_string_pretty(&PluginValue::Map(module)).unwrap_or_default();
        self.files.push((
            Path::new("descriptors")
                .join(family)
                .join(format!("{key}.json")),
            document,
        ));
        self
    }

    /// Add a raw source entry with no descriptor, e.g. `index.ts`.
    pub fn source_file(mut self, family: &str, entry: &str) -> Self {
        self.register_family(family);
        self.files.push((
            Path::new("dimension-adapters").join(family).join(entry),
            String::new(),
        ));
        self
    }

    /// Declare a family without adding entries (its directory may not exist).
    pub fn family(mut self, family: &str) -> Self {
        self.register_family(family);
        self
    }

    /// Add an entry to the liquidations directory. Names ending in `/`
    /// become directories.
    pub fn liquidation(mut self, entry: &str) -> Self {
        self.liquidations = true;
        self.files.push(Self::entry_file("liquidations", entry));
        self
    }

    /// Add an entry to the emissions directory.
    pub fn emission(mut self, entry: &str) -> Self {
        self.emissions = true;
        self.files.push(Self::entry_file("emissions", entry));
        self
    }

    /// Write a catalog containing one record per module identifier.
    pub fn catalog(mut self, kind: CatalogKind, modules: &[&str]) -> Self {
        self.catalogs = true;
        let records: Vec<serde_json::Value> = modules
            .iter()
            .map(|m| serde_json::json!({ "name": m, "module": m }))
            .collect();
        self.files.push((
            Path::new("catalogs").join(kind.file_name()),
            serde_json::Value::Array(records).to_string(),
        ));
        self
    }

    /// Write an arbitrary file relative to the workspace root.
    pub fn file(mut self, relative: &str, contents: &str) -> Self {
        self.files.push((PathBuf::from(relative), contents.to_string()));
        self
    }

    /// Create the temp directory and write every fixture file.
    pub fn build(self) -> io::Result<TestWorkspace> {
        let dir = TempDir::new()?;
        for (relative, contents) in &self.files {
            let path = dir.path().join(relative);
            if relative.to_string_lossy().ends_with('/') {
                fs::create_dir_all(&path)?;
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)?;
        }
        Ok(TestWorkspace {
            dir,
            families: self.families,
            liquidations: self.liquidations,
            emissions: self.emissions,
            catalogs: self.catalogs,
        })
    }

    fn register_family(&mut self, family: &str) {
        if !self.families.iter().any(|f| f == family) {
            self.families.push(family.to_string());
        }
    }

    fn entry_file(dir: &str, entry: &str) -> (PathBuf, String) {
        if entry.ends_with('/') {
            (PathBuf::from(format!("{dir}/{entry}")), String::new())
        } else {
            (Path::new(dir).join(entry), String::new())
        }
    }
}

/// A populated temp directory plus a matching configuration.
pub struct TestWorkspace {
    dir: TempDir,
    families: Vec<String>,
    liquidations: bool,
    emissions: bool,
    catalogs: bool,
}

impl TestWorkspace {
    pub fn builder() -> TestWorkspaceBuilder {
        TestWorkspaceBuilder::default()
    }

    /// Workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory generated files are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Contents of a generated file, if it was written.
    pub fn read_output(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.output_dir().join(name)).ok()
    }

    /// Configuration pointing every pipeline at this workspace.
    ///
    /// Steps without fixtures are disabled, and so is the artifact builder.
    pub fn config(&self) -> RegforgeConfig {
        let root = self.path();
        let path = |relative: &str| root.join(relative).to_string_lossy().into_owned();

        let mut config = RegforgeConfig::default();
        config.general.output_dir = path("out");
        config.general.sort_entries = true;

        config.families.names = self.families.clone();
        config.families.package = "@test/dimension-adapters".to_string();
        config.families.source_dir = path("dimension-adapters");
        config.families.descriptor_dir = Some(path("descriptors"));
        config.families.code_url = "https://example.test/blob/master".to_string();

        config.liquidations.enabled = self.liquidations;
        config.liquidations.package = "@test/adapters/liquidations".to_string();
        config.liquidations.source_dir = path("liquidations");

        config.emissions.enabled = self.emissions;
        config.emissions.package = "@test/emissions-adapters/protocols".to_string();
        config.emissions.source_dir = path("emissions");

        config.catalogs.enabled = self.catalogs;
        config.catalogs.protocols = path("catalogs/protocols.json");
        config.catalogs.treasuries = path("catalogs/treasuries.json");
        config.catalogs.entities = path("catalogs/entities.json");
        config.catalogs.package = "@test/adapters/projects".to_string();

        config.artifact.enabled = false;
        config
    }
}

/// `{name: value, ...}` as a plugin value.
pub fn object<const N: usize>(fields: [(&str, PluginValue); N]) -> PluginValue {
    fields.into_iter().collect::<ValueMap>().into()
}

/// A named callable.
pub fn callable(name: &str) -> PluginValue {
    PluginValue::Callable(name.to_string())
}
