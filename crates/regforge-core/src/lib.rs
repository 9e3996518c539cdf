// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the regforge registry generator.
//!
//! This crate provides the error taxonomy, plugin key normalization, and the
//! closed [`PluginValue`] model that every plugin descriptor is decoded into.

pub mod error;
pub mod types;
pub mod value;

// Re-export key items at crate root for ergonomic imports.
pub use error::RegforgeError;
pub use types::{DEFAULT_EXTENSIONS, ErrorScope, KeyState, PluginKey};
pub use value::{CALLABLE_MARKER, PluginValue, ValueMap};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_scopes_follow_taxonomy() {
        let missing = RegforgeError::MissingDefaultExport {
            module_path: "pkg/dexs/alpha".into(),
        };
        assert_eq!(missing.scope(), ErrorScope::Key);

        let load = RegforgeError::load("pkg/dexs/alpha", "descriptor not found");
        assert_eq!(load.scope(), ErrorScope::Key);

        let dir = RegforgeError::DirectoryUnavailable {
            path: "/nope".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(dir.scope(), ErrorScope::Family);

        let emit = RegforgeError::EmitFailure {
            path: "/nope/out.ts".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(emit.scope(), ErrorScope::Family);

        let external = RegforgeError::ExternalBuildFailure {
            command: "node build.js".into(),
            message: "exit status 1".into(),
            source: None,
        };
        assert_eq!(external.scope(), ErrorScope::Run);
    }

    #[test]
    fn missing_default_export_message_names_module() {
        let err = RegforgeError::MissingDefaultExport {
            module_path: "pkg/fees/beta".into(),
        };
        assert_eq!(
            err.to_string(),
            "module pkg/fees/beta does not have a default export"
        );
    }

    #[test]
    fn key_strips_recognized_extension() {
        assert_eq!(PluginKey::from_entry("adapter.ts", DEFAULT_EXTENSIONS).as_str(), "adapter");
        assert_eq!(PluginKey::from_entry("adapter", DEFAULT_EXTENSIONS).as_str(), "adapter");
        assert_eq!(PluginKey::from_entry("README.md", DEFAULT_EXTENSIONS).as_str(), "README");
    }

    #[test]
    fn key_strips_only_last_segment() {
        assert_eq!(PluginKey::from_entry("uniswap.v3.ts", DEFAULT_EXTENSIONS).as_str(), "uniswap.v3");
        assert_eq!(PluginKey::from_entry("uniswap.v3", DEFAULT_EXTENSIONS).as_str(), "uniswap.v3");
    }

    #[test]
    fn key_keeps_dotfiles_and_unknown_extensions() {
        assert_eq!(PluginKey::from_entry(".gitkeep", DEFAULT_EXTENSIONS).as_str(), ".gitkeep");
        assert_eq!(PluginKey::from_entry("notes.txt", DEFAULT_EXTENSIONS).as_str(), "notes.txt");
    }

    #[test]
    fn key_respects_custom_extension_list() {
        let exts = ["ts"];
        assert_eq!(PluginKey::from_entry("a.ts", &exts).as_str(), "a");
        assert_eq!(PluginKey::from_entry("a.md", &exts).as_str(), "a.md");
    }

    #[test]
    fn error_scope_display_and_parse() {
        use std::str::FromStr;
        for scope in [ErrorScope::Key, ErrorScope::Family, ErrorScope::Run] {
            let parsed = ErrorScope::from_str(&scope.to_string()).expect("should parse back");
            assert_eq!(parsed, scope);
        }
        assert_eq!(KeyState::Failed.to_string(), "failed");
    }
}
