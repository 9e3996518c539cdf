// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protocol, treasury, and entity catalogs.
//!
//! Each catalog is a JSON array of records; only the `module` field is read.
//! Records without a module identifier are skipped with a warning.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regforge_core::RegforgeError;
use serde::Deserialize;

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogRecord {
    /// Module identifier, e.g. `aave` or `treasury/aave.js`.
    #[serde(default)]
    pub module: Option<String>,
}

/// Load a catalog file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>, RegforgeError> {
    let text = fs::read_to_string(path).map_err(|e| RegforgeError::CatalogUnavailable {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    let records: Vec<CatalogRecord> =
        serde_json::from_str(&text).map_err(|e| RegforgeError::CatalogUnavailable {
            path: path.to_path_buf(),
            message: format!("expected a JSON array of records: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::debug!(path = %path.display(), records = records.len(), "loaded catalog");
    Ok(records)
}

/// Merge catalogs into unique module identifiers, keeping the order of
/// first occurrence across `catalogs` in the order given.
pub fn merge_modules<'a, I>(catalogs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [CatalogRecord]>,
{
    let mut seen = HashSet::new();
    let mut modules = Vec::new();
    let mut skipped = 0usize;

    for record in catalogs.into_iter().flatten() {
        match &record.module {
            Some(module) if !module.is_empty() => {
                if seen.insert(module.as_str()) {
                    modules.push(module.clone());
                }
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "catalog records without a module identifier were skipped");
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(modules: &[&str]) -> Vec<CatalogRecord> {
        modules
            .iter()
            .map(|m| CatalogRecord {
                module: Some(m.to_string()),
            })
            .collect()
    }

    #[test]
    fn load_ignores_extra_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.json");
        fs::write(
            &path,
            r#"[{"name": "Aave", "module": "aave", "tvl": 1}, {"name": "Nameless"}]"#,
        )
        .unwrap();

        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].module.as_deref(), Some("aave"));
        assert_eq!(loaded[1].module, None);
    }

    #[test]
    fn missing_catalog_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_catalog(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RegforgeError::CatalogUnavailable { .. }));
    }

    #[test]
    fn non_array_catalog_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("entities.json");
        fs::write(&path, r#"{"module": "aave"}"#).unwrap();

        let err = load_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
    }

    #[test]
    fn merge_dedupes_by_first_occurrence() {
        let protocols = records(&["aave", "compound", "aave"]);
        let treasuries = records(&["treasury/aave.js", "compound"]);
        let entities = records(&["entity/a16z.js"]);

        let merged = merge_modules([
            protocols.as_slice(),
            treasuries.as_slice(),
            entities.as_slice(),
        ]);
        assert_eq!(
            merged,
            vec!["aave", "compound", "treasury/aave.js", "entity/a16z.js"]
        );
    }

    #[test]
    fn merge_skips_records_without_module() {
        let mut catalog = records(&["aave"]);
        catalog.push(CatalogRecord { module: None });
        catalog.push(CatalogRecord {
            module: Some(String::new()),
        });

        assert_eq!(merge_modules([catalog.as_slice()]), vec!["aave"]);
    }
}
