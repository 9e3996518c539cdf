// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as unique family names, non-empty paths, and a runnable builder command.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{RegforgeConfig, RequireMapConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RegforgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.general.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "general.log_level `{}` must be one of: {}",
                config.general.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.general.output_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "general.output_dir must not be empty".to_string(),
        });
    }

    validate_families(config, &mut errors);

    for (section, map) in [
        ("liquidations", &config.liquidations),
        ("emissions", &config.emissions),
    ] {
        validate_require_map(section, map, &mut errors);
    }

    if config.catalogs.enabled {
        for (field, value) in [
            ("protocols", &config.catalogs.protocols),
            ("treasuries", &config.catalogs.treasuries),
            ("entities", &config.catalogs.entities),
            ("package", &config.catalogs.package),
            ("output_file", &config.catalogs.output_file),
        ] {
            if value.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("catalogs.{field} must not be empty"),
                });
            }
        }
    }

    if config.artifact.enabled {
        if config.artifact.map_file.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "artifact.map_file must not be empty".to_string(),
            });
        }
        if config.artifact.command.is_empty()
            || config.artifact.command[0].trim().is_empty()
        {
            errors.push(ConfigError::Validation {
                message: "artifact.command must name a program when artifact.enabled is true"
                    .to_string(),
            });
        }
        if !config.catalogs.enabled {
            errors.push(ConfigError::Validation {
                message: "artifact.enabled requires catalogs.enabled".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_families(config: &RegforgeConfig, errors: &mut Vec<ConfigError>) {
    let families = &config.families;

    let mut seen = HashSet::new();
    for (i, name) in families.names.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("families.names[{i}] must not be empty"),
            });
            continue;
        }
        if name.split('/').any(|segment| segment == ".." || segment.is_empty()) {
            errors.push(ConfigError::Validation {
                message: format!("families.names[{i}] `{name}` is not a relative directory name"),
            });
        }
        if !seen.insert(name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate family name `{name}` in families.names"),
            });
        }
    }

    if families.names.is_empty() {
        return;
    }

    for (field, value) in [
        ("package", &families.package),
        ("source_dir", &families.source_dir),
        ("type_name", &families.type_name),
        ("output_suffix", &families.output_suffix),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("families.{field} must not be empty"),
            });
        }
    }

    for ext in &families.extensions {
        if ext.is_empty() || ext.contains('.') {
            errors.push(ConfigError::Validation {
                message: format!(
                    "families.extensions entry `{ext}` must be a bare extension without dots"
                ),
            });
        }
    }

    if families.max_value_depth == 0 {
        errors.push(ConfigError::Validation {
            message: "families.max_value_depth must be at least 1".to_string(),
        });
    }
}

fn validate_require_map(section: &str, map: &RequireMapConfig, errors: &mut Vec<ConfigError>) {
    if !map.enabled {
        return;
    }
    for (field, value) in [
        ("package", &map.package),
        ("source_dir", &map.source_dir),
        ("output_file", &map.output_file),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{section}.{field} must not be empty"),
            });
        }
    }
}
