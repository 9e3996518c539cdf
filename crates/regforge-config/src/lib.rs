// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the regforge registry generator.
//!
//! `regforge.toml` is deserialized strictly (unknown keys are errors), layered
//! with Figment over compiled defaults and `REGFORGE_*` environment
//! variables, then checked for settings that parse but cannot produce a
//! build. Every failure comes back as a [`ConfigError`] miette can render.
//!
//! ```no_run
//! use regforge_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Writing registries to {}", config.general.output_dir);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::RegforgeConfig;

/// Load from the search path hierarchy and validate.
pub fn load_and_validate() -> Result<RegforgeConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::search_paths()
            .iter()
            .filter_map(|path| read_source(path))
            .collect()
    })
}

/// Load one explicit file (plus environment overrides) and validate.
///
/// A path that does not exist is an error rather than an empty layer.
pub fn load_and_validate_path(path: &Path) -> Result<RegforgeConfig, Vec<ConfigError>> {
    if !path.is_file() {
        return Err(vec![ConfigError::Other(format!(
            "config file `{}` does not exist",
            path.display()
        ))]);
    }
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load TOML text over the defaults and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<RegforgeConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config, or turn the figment failure into diagnostics.
/// `sources` is only read on failure.
fn checked(
    loaded: Result<RegforgeConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<RegforgeConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

// Figment records file sources by absolute path.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let shown = match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    Some((shown.display().to_string(), content))
}
