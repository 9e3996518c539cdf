// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regforge - build-time generator of static plugin registries.
//!
//! This is the binary entry point.

mod build;
mod inspect;
mod list;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use regforge_config::RegforgeConfig;
use tracing::{debug, error};

/// Regforge - build-time generator of static plugin registries.
#[derive(Parser, Debug)]
#[command(name = "regforge", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level regardless of configuration.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every registry and require map.
    Build {
        /// Only build registries for these families (repeatable).
        #[arg(long = "only", value_name = "FAMILY")]
        only: Vec<String>,
        /// Do not write the artifact map or run the artifact builder.
        #[arg(long)]
        skip_artifact: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the plugin keys a family directory would produce.
    List {
        /// Family name, e.g. `dexs`.
        family: String,
    },
    /// Load one descriptor and print its mocked default export.
    Inspect {
        /// Path to a JSON or TOML descriptor.
        descriptor: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            regforge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    init_tracing(level);
    debug!(
        config = %cli
            .config
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "search path".to_string()),
        output_dir = %config.general.output_dir,
        families = config.families.names.len(),
        "configuration loaded"
    );

    let result = match cli.command {
        Commands::Build {
            only,
            skip_artifact,
            plain,
        } => {
            build::run_build_command(&config, only, skip_artifact, plain);
            Ok(())
        }
        Commands::List { family } => list::run_list(&config, &family),
        Commands::Inspect { descriptor } => inspect::run_inspect(&config, &descriptor),
    };

    if let Err(e) = result {
        error!(scope = %e.scope(), error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<RegforgeConfig, Vec<regforge_config::ConfigError>> {
    match path {
        Some(path) => regforge_config::load_and_validate_path(path),
        None => regforge_config::load_and_validate(),
    }
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("regforge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_accepts_repeated_only() {
        let cli = Cli::parse_from([
            "regforge",
            "build",
            "--only",
            "dexs",
            "--only",
            "fees",
            "--skip-artifact",
        ]);
        match cli.command {
            Commands::Build {
                only,
                skip_artifact,
                plain,
            } => {
                assert_eq!(only, vec!["dexs", "fees"]);
                assert!(skip_artifact);
                assert!(!plain);
            }
            other => panic!("expected build, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["regforge", "list", "dexs", "--config", "x.toml", "-v"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(cli.verbose);
    }
}
