// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config diagnostics.
//!
//! Figment reports extraction failures as a chain of `figment::Error`s. Each
//! one becomes a [`ConfigError`] that miette can render against the
//! `regforge.toml` it came from, with the offending key underlined and a
//! close spelling suggested when one exists.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a known key must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A problem with the regforge configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section of `regforge.toml` declares.
    #[error("unknown key `{key}` in {}", section_label(.section))]
    #[diagnostic(
        code(regforge::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted table the key appeared in, empty for the document root.
        section: String,
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        #[label("not a regforge setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the setting's type.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(regforge::config::invalid_type), help("`{key}` takes {expected}"))]
    InvalidType {
        /// Dotted path of the setting, e.g. `general.sort_entries`.
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A setting with no default that the merged config never provided.
    #[error("missing required setting `{key}`")]
    #[diagnostic(
        code(regforge::config::missing_key),
        help("set `{key}` in regforge.toml or through a REGFORGE_ environment variable")
    )]
    MissingKey { key: String },

    /// The config parsed but describes an unusable build.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(regforge::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(regforge::config::other))]
    Other(String),
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? accepted keys: {valid_keys}"),
        None => format!("accepted keys: {valid_keys}"),
    }
}

/// The TOML documents that fed a figment, keyed by display path.
struct SourceSet<'a> {
    files: &'a [(String, String)],
}

impl<'a> SourceSet<'a> {
    /// Text of the file `error` was read from, if it is one of ours.
    fn origin(&self, error: &figment::Error) -> Option<&'a (String, String)> {
        let path = match error.metadata.as_ref()?.source.as_ref()? {
            figment::Source::File(path) => path.display().to_string(),
            _ => return None,
        };
        self.files.iter().find(|(name, _)| *name == path)
    }

    /// Span of `key` inside the `[section]` table of the originating file.
    fn locate(
        &self,
        error: &figment::Error,
        section: &[String],
        key: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let origin = self
            .origin(error)
            .or_else(|| (self.files.len() == 1).then(|| &self.files[0]));
        let Some((name, content)) = origin else {
            return (None, None);
        };
        match find_key_offset(content, section, key) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), key.len())),
                Some(NamedSource::new(name, content.clone())),
            ),
            None => (None, None),
        }
    }
}

fn dotted(parts: &[String]) -> String {
    parts.join(".")
}

impl ConfigError {
    fn from_figment(error: figment::Error, sources: &SourceSet<'_>) -> Self {
        let path: Vec<String> = error.path.clone();
        match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = sources.locate(&error, &path, field);
                ConfigError::UnknownKey {
                    section: dotted(&path),
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let mut full = path;
                full.push(field.to_string());
                ConfigError::MissingKey { key: dotted(&full) }
            }
            Kind::InvalidType(found, expected) => {
                let (span, src) = match path.split_last() {
                    Some((key, section)) => sources.locate(&error, section, key),
                    None => (None, None),
                };
                ConfigError::InvalidType {
                    key: dotted(&path),
                    found: found.to_string(),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        }
    }
}

/// Convert every error in a figment failure chain into a [`ConfigError`].
///
/// `toml_sources` pairs each candidate file's display path with its text so
/// spans can be resolved.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    let sources = SourceSet {
        files: toml_sources,
    };
    err.into_iter()
        .map(|error| ConfigError::from_figment(error, &sources))
        .collect()
}

/// Byte offset of `key` as written inside the `[section]` table of `content`.
///
/// An empty `section` means keys before the first table header. Only the
/// named table is searched, so a key of the same name in another section is
/// never matched.
pub fn find_key_offset(content: &str, section: &[String], key: &str) -> Option<usize> {
    let wanted = dotted(section);
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
        } else if current == wanted {
            let name = trimmed.split('=').next().unwrap_or_default().trim_end();
            if name == key && trimmed.contains('=') {
                return Some(offset + indent);
            }
        }
        offset += line.len();
    }

    None
}

/// Closest accepted key to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
    if errors.len() > 1 {
        eprintln!("regforge: {} configuration errors", errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn suggests_output_dir_for_typo() {
        let valid = &["log_level", "output_dir", "sort_entries"];
        assert_eq!(suggest_key("ouput_dir", valid), Some("output_dir".to_string()));
    }

    #[test]
    fn suggests_names_for_nmes() {
        let valid = &["names", "package", "source_dir", "code_url"];
        assert_eq!(suggest_key("nmes", valid), Some("names".to_string()));
    }

    #[test]
    fn distant_typo_gets_no_suggestion() {
        let valid = &["log_level", "output_dir", "sort_entries"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_is_found_inside_its_section() {
        let content = "[general]\nouput_dir = \"out\"\n";
        let offset = find_key_offset(content, &section(&["general"]), "ouput_dir").unwrap();
        assert_eq!(&content[offset..offset + 9], "ouput_dir");
    }

    #[test]
    fn key_is_found_inside_nested_table() {
        let content = "[families]\nnames = []\n\n[families.normalize]\n  enabeld = true\n";
        let offset =
            find_key_offset(content, &section(&["families", "normalize"]), "enabeld").unwrap();
        assert_eq!(&content[offset..offset + 7], "enabeld");
    }

    #[test]
    fn same_key_in_other_section_is_ignored() {
        let content = "[liquidations]\nenabled = true\n\n[emissions]\nenabled = false\n";
        let offset = find_key_offset(content, &section(&["emissions"]), "enabled").unwrap();
        assert!(content[offset..].starts_with("enabled = false"));
        assert!(find_key_offset(content, &section(&["catalogs"]), "enabled").is_none());
    }

    #[test]
    fn root_keys_precede_first_header() {
        let content = "verbose = true\n[general]\n";
        assert_eq!(find_key_offset(content, &[], "verbose"), Some(0));
    }

    #[test]
    fn unknown_key_help_leads_with_suggestion() {
        let help = unknown_key_help(Some("output_dir"), "log_level, output_dir");
        assert!(help.starts_with("did you mean `output_dir`?"));
        assert_eq!(unknown_key_help(None, "a, b"), "accepted keys: a, b");
    }

    #[test]
    fn root_section_is_labelled() {
        assert_eq!(section_label(""), "the top level");
        assert_eq!(section_label("families.normalize"), "[families.normalize]");
    }
}
