// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path conventions for one plugin family.

use std::path::{Path, PathBuf};

use regforge_core::{PluginKey, RegforgeError};

use crate::lister::{ListOptions, ListedEntry, drop_shadowed_descriptors, list_entries};

/// Location and naming conventions of a single plugin family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFamily {
    /// Family name, possibly nested (`options/premium`).
    pub name: String,
    /// Directory listed for plugin entries.
    pub source_dir: PathBuf,
    /// Directory descriptors are loaded from.
    pub descriptor_dir: PathBuf,
    /// `<package>/<name>`, prefix of every logical module path.
    pub module_prefix: String,
    /// `<code_url>/<name>`, prefix of every source link.
    pub code_url_prefix: String,
    /// Generated registry file.
    pub output_path: PathBuf,
}

impl PluginFamily {
    /// Build a family from the shared layout settings.
    pub fn new(
        name: &str,
        source_root: &Path,
        descriptor_root: Option<&Path>,
        package: &str,
        code_url: &str,
        output_dir: &Path,
        output_suffix: &str,
    ) -> Self {
        let source_dir = source_root.join(name);
        let descriptor_dir = descriptor_root
            .map(|root| root.join(name))
            .unwrap_or_else(|| source_dir.clone());
        Self {
            name: name.to_string(),
            source_dir,
            descriptor_dir,
            module_prefix: format!("{}/{}", package.trim_end_matches('/'), name),
            code_url_prefix: format!("{}/{}", code_url.trim_end_matches('/'), name),
            output_path: output_dir.join(Self::output_file_name(name, output_suffix)),
        }
    }

    /// Output file name for a family: `/` becomes `_`, then the suffix.
    pub fn output_file_name(name: &str, suffix: &str) -> String {
        format!("{}{}", name.replace('/', "_"), suffix)
    }

    /// Logical module path for `key`.
    pub fn module_path(&self, key: &PluginKey) -> String {
        format!("{}/{}", self.module_prefix, key)
    }

    /// Source link for the raw entry name.
    pub fn code_path(&self, entry: &str) -> String {
        format!("{}/{}", self.code_url_prefix, entry)
    }

    /// True when descriptors are read from the source directory itself.
    pub fn descriptors_colocated(&self) -> bool {
        self.descriptor_dir == self.source_dir
    }

    /// Plugin entries of this family.
    ///
    /// With colocated descriptors, a descriptor file that shares its key with
    /// a source entry is not listed separately.
    pub fn list_plugins(&self, options: &ListOptions) -> Result<Vec<ListedEntry>, RegforgeError> {
        let entries = list_entries(&self.source_dir, options)?;
        if self.descriptors_colocated() {
            Ok(drop_shadowed_descriptors(entries))
        } else {
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(name: &str, descriptors: Option<&Path>) -> PluginFamily {
        PluginFamily::new(
            name,
            Path::new("./dimension-adapters"),
            descriptors,
            "@pkg/dimension-adapters",
            "https://example.test/blob/master/",
            Path::new("out"),
            "_adapters.ts",
        )
    }

    #[test]
    fn paths_follow_family_layout() {
        let dexs = family("dexs", None);
        assert_eq!(dexs.source_dir, Path::new("./dimension-adapters/dexs"));
        assert_eq!(dexs.descriptor_dir, dexs.source_dir);
        assert_eq!(dexs.output_path, Path::new("out/dexs_adapters.ts"));
        assert_eq!(
            dexs.module_path(&PluginKey::from("uniswap")),
            "@pkg/dimension-adapters/dexs/uniswap"
        );
        assert_eq!(
            dexs.code_path("uniswap.ts"),
            "https://example.test/blob/master/dexs/uniswap.ts"
        );
    }

    #[test]
    fn nested_family_output_is_flattened() {
        let premium = family("options/premium", Some(Path::new("descriptors")));
        assert_eq!(premium.output_path, Path::new("out/options_premium_adapters.ts"));
        assert_eq!(premium.descriptor_dir, Path::new("descriptors/options/premium"));
    }

    #[test]
    fn colocated_listing_keeps_one_entry_per_plugin() {
        let tmp = tempfile::tempdir().unwrap();
        let dexs_dir = tmp.path().join("dexs");
        std::fs::create_dir(&dexs_dir).unwrap();
        for name in ["alpha.ts", "alpha.json", "beta.ts", "beta.json", "gamma.json"] {
            std::fs::write(dexs_dir.join(name), "").unwrap();
        }
        let dexs = PluginFamily::new(
            "dexs",
            tmp.path(),
            None,
            "@pkg/dimension-adapters",
            "https://example.test",
            Path::new("out"),
            "_adapters.ts",
        );
        let options = ListOptions::for_family(
            vec![],
            regforge_core::DEFAULT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            false,
        );

        let mut names: Vec<String> = dexs
            .list_plugins(&options)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["alpha.ts", "beta.ts", "gamma.json"]);
    }
}
