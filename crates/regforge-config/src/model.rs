// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the regforge registry generator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use regforge_core::PluginValue;
use serde::{Deserialize, Serialize};

/// Top-level regforge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the layout of the adapters monorepo.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegforgeConfig {
    /// Output location and logging.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Plugin families that get full load/validate/mock registries.
    #[serde(default)]
    pub families: FamiliesConfig,

    /// Flat require map over the liquidations directory.
    #[serde(default = "RequireMapConfig::liquidations")]
    pub liquidations: RequireMapConfig,

    /// Flat require map over the emissions protocols directory.
    #[serde(default = "RequireMapConfig::emissions")]
    pub emissions: RequireMapConfig,

    /// Protocol, treasury, and entity catalogs.
    #[serde(default)]
    pub catalogs: CatalogsConfig,

    /// Key-to-path map and the secondary artifact builder.
    #[serde(default)]
    pub artifact: ArtifactConfig,
}

impl Default for RegforgeConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            families: FamiliesConfig::default(),
            liquidations: RequireMapConfig::liquidations(),
            emissions: RequireMapConfig::emissions(),
            catalogs: CatalogsConfig::default(),
            artifact: ArtifactConfig::default(),
        }
    }
}

/// Output location and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory every generated file is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Sort directory listings lexically instead of keeping filesystem order.
    #[serde(default)]
    pub sort_entries: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_dir: default_output_dir(),
            sort_entries: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> String {
    "./src/utils/imports".to_string()
}

/// Plugin family configuration.
///
/// A family named `dexs` is listed from `{source_dir}/dexs`, loaded as
/// `{package}/dexs/<key>`, linked to `{code_url}/dexs/<entry>`, and written
/// to `{output_dir}/dexs{output_suffix}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FamiliesConfig {
    /// Family names, processed in this order.
    #[serde(default = "default_family_names")]
    pub names: Vec<String>,

    /// Package prefix of the logical module path.
    #[serde(default = "default_family_package")]
    pub package: String,

    /// Directory holding one subdirectory per family.
    #[serde(default = "default_family_source_dir")]
    pub source_dir: String,

    /// Directory holding descriptor files, laid out like `source_dir`.
    /// Descriptors are looked up in `source_dir` when unset.
    #[serde(default)]
    pub descriptor_dir: Option<String>,

    /// Base URL for browsable source links.
    #[serde(default = "default_code_url")]
    pub code_url: String,

    /// Reserved entry names that never become plugin keys.
    #[serde(default = "default_family_exclude")]
    pub exclude: Vec<String>,

    /// Extensions stripped from entry names to form plugin keys.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Maximum nesting depth accepted for a plugin module.
    #[serde(default = "default_max_value_depth")]
    pub max_value_depth: usize,

    /// Type name used in the generated import and trailing annotation.
    #[serde(default = "default_type_name")]
    pub type_name: String,

    /// Module the type name is imported from.
    #[serde(default = "default_type_module")]
    pub type_module: String,

    /// Suffix appended to the family name to form the output file name.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Default-filling applied to every loaded default export.
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

impl Default for FamiliesConfig {
    fn default() -> Self {
        Self {
            names: default_family_names(),
            package: default_family_package(),
            source_dir: default_family_source_dir(),
            descriptor_dir: None,
            code_url: default_code_url(),
            exclude: default_family_exclude(),
            extensions: default_extensions(),
            max_value_depth: default_max_value_depth(),
            type_name: default_type_name(),
            type_module: default_type_module(),
            output_suffix: default_output_suffix(),
            normalize: NormalizeConfig::default(),
        }
    }
}

fn default_family_names() -> Vec<String> {
    [
        "dexs",
        "fees",
        "aggregators",
        "options",
        "incentives",
        "aggregator-derivatives",
        "bridge-aggregators",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_family_package() -> String {
    "@defillama/dimension-adapters".to_string()
}

fn default_family_source_dir() -> String {
    "./dimension-adapters".to_string()
}

fn default_code_url() -> String {
    "https://github.com/DefiLlama/dimension-adapters/blob/master".to_string()
}

fn default_family_exclude() -> Vec<String> {
    vec!["index".to_string(), "README".to_string(), ".gitkeep".to_string()]
}

fn default_extensions() -> Vec<String> {
    regforge_core::DEFAULT_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_value_depth() -> usize {
    64
}

fn default_type_name() -> String {
    "Adapter".to_string()
}

fn default_type_module() -> String {
    "@defillama/dimension-adapters/adapters/types".to_string()
}

fn default_output_suffix() -> String {
    "_adapters.ts".to_string()
}

/// Default-filling rules applied to each loaded default export.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Disable to pass default exports through untouched.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Top-level fields filled in when absent.
    #[serde(default = "default_top_level_defaults")]
    pub defaults: BTreeMap<String, PluginValue>,

    /// Map-valued field whose children receive `nested_defaults`.
    #[serde(default = "default_nested_key")]
    pub nested_key: Option<String>,

    /// Fields filled into every map child of `nested_key` when absent.
    #[serde(default)]
    pub nested_defaults: BTreeMap<String, PluginValue>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            defaults: default_top_level_defaults(),
            nested_key: default_nested_key(),
            nested_defaults: BTreeMap::new(),
        }
    }
}

fn default_top_level_defaults() -> BTreeMap<String, PluginValue> {
    let mut defaults = BTreeMap::new();
    defaults.insert("version".to_string(), PluginValue::from(1i64));
    defaults
}

fn default_nested_key() -> Option<String> {
    Some("adapter".to_string())
}

fn default_true() -> bool {
    true
}

/// A flat `require(...)` map over one directory, without loading or mocking.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RequireMapConfig {
    /// Whether this map is generated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Package prefix prepended to each raw entry name.
    #[serde(default)]
    pub package: String,

    /// Directory whose immediate entries are mapped.
    #[serde(default)]
    pub source_dir: String,

    /// Entry names skipped verbatim.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Strip recognized extensions from keys (load paths keep the raw name).
    #[serde(default)]
    pub strip_extensions: bool,

    /// Output file name inside `general.output_dir`.
    #[serde(default)]
    pub output_file: String,
}

impl RequireMapConfig {
    /// Defaults for the liquidations map.
    pub fn liquidations() -> Self {
        Self {
            enabled: true,
            package: "@defillama/adapters/liquidations".to_string(),
            source_dir: "./DefiLlama-Adapters/liquidations".to_string(),
            exclude: vec![
                "test.ts".to_string(),
                "utils".to_string(),
                "README.md".to_string(),
            ],
            strip_extensions: false,
            output_file: "adapters_liquidations.ts".to_string(),
        }
    }

    /// Defaults for the emissions map.
    pub fn emissions() -> Self {
        Self {
            enabled: true,
            package: "@defillama/emissions-adapters/protocols".to_string(),
            source_dir: "./emissions-adapters/protocols".to_string(),
            exclude: vec![],
            strip_extensions: true,
            output_file: "emissions_adapters.ts".to_string(),
        }
    }
}

/// Input catalogs merged into the project require map and the artifact map.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogsConfig {
    /// Whether the catalog require map and artifact map are generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON array of protocol records.
    #[serde(default = "default_protocols_path")]
    pub protocols: String,

    /// JSON array of treasury records.
    #[serde(default = "default_treasuries_path")]
    pub treasuries: String,

    /// JSON array of entity records.
    #[serde(default = "default_entities_path")]
    pub entities: String,

    /// Package prefix for each catalog module identifier.
    #[serde(default = "default_catalog_package")]
    pub package: String,

    /// Output file name inside `general.output_dir`.
    #[serde(default = "default_catalog_output")]
    pub output_file: String,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            protocols: default_protocols_path(),
            treasuries: default_treasuries_path(),
            entities: default_entities_path(),
            package: default_catalog_package(),
            output_file: default_catalog_output(),
        }
    }
}

fn default_protocols_path() -> String {
    "./src/protocols/data.json".to_string()
}

fn default_treasuries_path() -> String {
    "./src/protocols/treasury.json".to_string()
}

fn default_entities_path() -> String {
    "./src/protocols/entities.json".to_string()
}

fn default_catalog_package() -> String {
    "@defillama/adapters/projects".to_string()
}

fn default_catalog_output() -> String {
    "adapters.ts".to_string()
}

/// Secondary artifact builder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Whether the map is written and the builder invoked.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// File name of the key-to-path map inside `general.output_dir`.
    #[serde(default = "default_map_file")]
    pub map_file: String,

    /// Program and arguments; the map file path is appended as the last argument.
    #[serde(default = "default_artifact_command")]
    pub command: Vec<String>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            map_file: default_map_file(),
            command: default_artifact_command(),
        }
    }
}

fn default_map_file() -> String {
    "tvlAdapterData.json".to_string()
}

fn default_artifact_command() -> Vec<String> {
    vec![
        "node".to_string(),
        "./src/cli/buildTvlModuleData.js".to_string(),
    ]
}
