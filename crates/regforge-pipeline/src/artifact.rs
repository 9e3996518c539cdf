// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secondary artifact builder invocation.
//!
//! The builder is an external program; it receives the path of the
//! key-to-path map as its last argument and shares this process's stdio.
//! Only its exit status is inspected.

use std::path::Path;
use std::process::{Command, Stdio};

use regforge_core::RegforgeError;

/// Run `command` with `map_path` appended and wait for it to exit.
pub fn run_artifact_builder(command: &[String], map_path: &Path) -> Result<(), RegforgeError> {
    let rendered = format!("{} {}", command.join(" "), map_path.display());
    let Some((program, args)) = command.split_first() else {
        return Err(RegforgeError::ExternalBuildFailure {
            command: rendered,
            message: "no program configured".to_string(),
            source: None,
        });
    };

    tracing::info!(command = %rendered, "running artifact builder");
    let status = Command::new(program)
        .args(args)
        .arg(map_path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| RegforgeError::ExternalBuildFailure {
            command: rendered.clone(),
            message: format!("failed to start: {e}"),
            source: Some(e),
        })?;

    if status.success() {
        tracing::info!(command = %rendered, "artifact builder finished");
        Ok(())
    } else {
        Err(RegforgeError::ExternalBuildFailure {
            command: rendered,
            message: format!("exited with {status}"),
            source: None,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn map_path_is_passed_as_last_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let map = tmp.path().join("map.json");
        std::fs::write(&map, "{}").unwrap();
        let marker = tmp.path().join("seen");

        // with `sh -c`, the first extra argument becomes $0
        let script = format!("cp \"$0\" {}", marker.display());
        run_artifact_builder(&sh(&script), &map).unwrap();
        assert_eq!(std::fs::read_to_string(marker).unwrap(), "{}");
    }

    #[test]
    fn non_zero_exit_is_external_build_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_artifact_builder(&sh("exit 3"), &tmp.path().join("map.json")).unwrap_err();
        match err {
            RegforgeError::ExternalBuildFailure { message, .. } => {
                assert!(message.contains('3'), "unexpected message: {message}");
            }
            other => panic!("expected ExternalBuildFailure, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_external_build_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let command = vec!["regforge-definitely-missing-builder".to_string()];
        let err = run_artifact_builder(&command, &tmp.path().join("map.json")).unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_artifact_builder(&[], &tmp.path().join("map.json")).unwrap_err();
        assert!(err.to_string().contains("no program configured"));
    }
}
