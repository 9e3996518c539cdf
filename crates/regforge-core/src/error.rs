// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the regforge registry generator.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ErrorScope;

/// The primary error type used across discovery, loading, and emission.
///
/// Every variant belongs to exactly one [`ErrorScope`]; the pipeline driver
/// uses the scope to decide how much work a failure skips.
#[derive(Debug, Error)]
pub enum RegforgeError {
    /// Configuration errors raised outside the config crate's diagnostics.
    #[error("configuration error: {0}")]
    Config(String),

    /// A plugin family's root directory could not be listed.
    #[error("directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A loaded plugin module has no (or a null) default export.
    #[error("module {module_path} does not have a default export")]
    MissingDefaultExport { module_path: String },

    /// Any other failure while loading or normalizing a plugin module.
    #[error("failed to load module {module_path}: {message}")]
    LoadFailure {
        module_path: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A plugin module is nested deeper than the configured limit.
    #[error("module {module_path} is nested {depth} levels deep (limit {limit})")]
    ValueTooDeep {
        module_path: String,
        depth: usize,
        limit: usize,
    },

    /// Writing a generated file failed.
    #[error("failed to write {}: {source}", path.display())]
    EmitFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input catalog could not be read or decoded.
    #[error("catalog unavailable: {}: {message}", path.display())]
    CatalogUnavailable {
        path: PathBuf,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The secondary artifact builder could not be started or exited abnormally.
    #[error("external build `{command}` failed: {message}")]
    ExternalBuildFailure {
        command: String,
        message: String,
        source: Option<std::io::Error>,
    },
}

impl RegforgeError {
    /// Shorthand for a [`RegforgeError::LoadFailure`] without an underlying source.
    pub fn load(module_path: impl Into<String>, message: impl Into<String>) -> Self {
        RegforgeError::LoadFailure {
            module_path: module_path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// The narrowest unit of work this error invalidates.
    pub fn scope(&self) -> ErrorScope {
        match self {
            RegforgeError::MissingDefaultExport { .. }
            | RegforgeError::LoadFailure { .. }
            | RegforgeError::ValueTooDeep { .. } => ErrorScope::Key,
            RegforgeError::DirectoryUnavailable { .. }
            | RegforgeError::EmitFailure { .. }
            | RegforgeError::CatalogUnavailable { .. } => ErrorScope::Family,
            RegforgeError::Config(_) | RegforgeError::ExternalBuildFailure { .. } => {
                ErrorScope::Run
            }
        }
    }
}
