// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Later layers win: compiled defaults, then every file from
//! [`search_paths`] that exists, then `REGFORGE_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RegforgeConfig;

/// File name looked up in each search directory.
pub const CONFIG_FILE_NAME: &str = "regforge.toml";

const ENV_PREFIX: &str = "REGFORGE_";

/// Env-var name prefixes and the dotted config path each one addresses.
/// Nested tables come before their parent.
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("families_normalize_", "families.normalize."),
    ("general_", "general."),
    ("families_", "families."),
    ("liquidations_", "liquidations."),
    ("emissions_", "emissions."),
    ("catalogs_", "catalogs."),
    ("artifact_", "artifact."),
];

/// Config files consulted by [`load_config`], lowest precedence first:
/// system-wide, then the user's XDG config dir, then the working directory.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("/etc/regforge").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("regforge").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(RegforgeConfig::default()))
}

/// The full layered figment, before extraction.
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

/// Load from the search path hierarchy plus environment overrides.
pub fn load_config() -> Result<RegforgeConfig, figment::Error> {
    build_figment().extract()
}

/// Load one explicit file plus environment overrides, skipping the search path.
pub fn load_config_from_path(path: &Path) -> Result<RegforgeConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load TOML text over the defaults. The environment is not consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<RegforgeConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

// `Env::split("_")` would turn `output_dir` into `output.dir`, so sections are
// matched by prefix instead.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|name| env_key(name.as_str()).into())
}

/// `general_output_dir` -> `general.output_dir`. Unknown prefixes pass through.
fn env_key(name: &str) -> String {
    ENV_SECTIONS
        .iter()
        .find_map(|(prefix, path)| {
            name.strip_prefix(prefix)
                .map(|rest| format!("{path}{rest}"))
        })
        .unwrap_or_else(|| name.to_string())
}
