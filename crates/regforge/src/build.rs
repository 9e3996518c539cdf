// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `regforge build` command implementation.
//!
//! Runs the full pipeline and prints a per-step, per-family summary. Plugin
//! and step failures are reported but never change the exit status.

use std::io::IsTerminal;

use regforge_config::RegforgeConfig;
use regforge_pipeline::{BuildOptions, FamilyStatus, RunReport, StepOutcome, run_build};
use tracing::info;

/// Severity of one summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStatus {
    Ok,
    Warn,
    Fail,
    Skip,
}

/// Run the `regforge build` command.
pub fn run_build_command(config: &RegforgeConfig, only: Vec<String>, skip_artifact: bool, plain: bool) {
    let use_color = !plain && std::io::stdout().is_terminal();
    info!(
        only = ?only,
        skip_artifact,
        "starting regforge build"
    );
    let report = run_build(
        config,
        BuildOptions {
            only,
            skip_artifact,
        },
    );

    println!();
    println!("  regforge build");
    println!("  {}", "-".repeat(50));
    for (status, name, message) in summary_lines(&report) {
        println!("{}", format_line(status, &name, &message, use_color));
    }
    println!();

    let failed_keys = report.failed_keys();
    if report.has_failures() {
        let key_word = if failed_keys == 1 { "plugin" } else { "plugins" };
        println!("  Finished with failures ({failed_keys} {key_word} skipped).");
        println!("  Run with --verbose or RUST_LOG=regforge=debug for details.");
    } else {
        println!("  All registries generated.");
    }
    println!();
}

fn summary_lines(report: &RunReport) -> Vec<(LineStatus, String, String)> {
    let mut lines = Vec::new();

    for step in &report.steps {
        let (status, message) = match &step.outcome {
            StepOutcome::Written { path, entries } => (
                LineStatus::Ok,
                format!("{entries} entries -> {}", path.display()),
            ),
            StepOutcome::Skipped { reason } => (LineStatus::Skip, reason.clone()),
            StepOutcome::Failed { error } => (LineStatus::Fail, error.to_string()),
        };
        lines.push((status, step.name.clone(), message));
    }

    for family in &report.families {
        let succeeded = family.succeeded().count();
        let failed = family.failed().count();
        let (status, message) = match (family.status, &family.error) {
            (FamilyStatus::Aborted, Some(error)) => (LineStatus::Fail, error.to_string()),
            (FamilyStatus::Complete, _) if failed > 0 => (
                LineStatus::Warn,
                format!(
                    "{succeeded} registered, {failed} failed -> {}",
                    family.output_path.display()
                ),
            ),
            (FamilyStatus::Complete, _) => (
                LineStatus::Ok,
                format!("{succeeded} registered -> {}", family.output_path.display()),
            ),
            (status, _) => (LineStatus::Fail, status.to_string()),
        };
        lines.push((status, family.name.clone(), message));
    }

    lines
}

fn format_line(status: LineStatus, name: &str, message: &str, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match status {
            LineStatus::Ok => ("✓".green(), message.normal()),
            LineStatus::Warn => ("!".yellow(), message.yellow()),
            LineStatus::Fail => ("✗".red(), message.red()),
            LineStatus::Skip => ("-".dimmed(), message.dimmed()),
        };
        format!("    {symbol} {name:<24} {message}")
    } else {
        let tag = match status {
            LineStatus::Ok => "[OK]  ",
            LineStatus::Warn => "[WARN]",
            LineStatus::Fail => "[FAIL]",
            LineStatus::Skip => "[SKIP]",
        };
        format!("    {tag} {name:<24} {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regforge_core::RegforgeError;
    use regforge_pipeline::{FamilyReport, KeyOutcome};
    use regforge_core::PluginKey;
    use std::path::PathBuf;

    #[test]
    fn plain_lines_use_tags() {
        assert_eq!(
            format_line(LineStatus::Fail, "dexs", "boom", false),
            format!("    [FAIL] {:<24} boom", "dexs")
        );
        assert!(format_line(LineStatus::Ok, "fees", "3 registered", false).starts_with("    [OK]  "));
    }

    #[test]
    fn summary_marks_partial_families_as_warnings() {
        let mut family = FamilyReport::new("dexs", PathBuf::from("out/dexs_adapters.ts"));
        let mut ok = KeyOutcome::pending(PluginKey::from("alpha"), "alpha.ts");
        ok.succeed();
        let mut bad = KeyOutcome::pending(PluginKey::from("beta"), "beta.ts");
        bad.fail(RegforgeError::MissingDefaultExport {
            module_path: "@pkg/dexs/beta".into(),
        });
        family.outcomes.extend([ok, bad]);
        family.status = FamilyStatus::Complete;

        let report = RunReport {
            steps: vec![],
            families: vec![family],
        };
        let lines = summary_lines(&report);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, LineStatus::Warn);
        assert!(lines[0].2.starts_with("1 registered, 1 failed"));
    }
}
