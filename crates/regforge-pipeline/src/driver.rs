// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build driver.
//!
//! Runs every generation step in a fixed order:
//!
//! 1. catalog require map (`adapters.ts`)
//! 2. artifact map plus the external artifact builder
//! 3. liquidations require map
//! 4. one registry per plugin family
//! 5. emissions require map
//!
//! Failures are contained at the narrowest scope that covers them: a broken
//! plugin drops only its own key, a missing directory or failed write drops
//! only its family or step, and a failed catalog skips only the steps that
//! need it. The driver never stops early.

use std::path::Path;

use regforge_config::RegforgeConfig;
use regforge_config::model::{NormalizeConfig, RequireMapConfig};
use regforge_core::RegforgeError;
use regforge_plugin::{
    FsModuleLoader, ListOptions, LoadRequest, ModuleDefaults, ModuleLoader, NoopNormalizer,
    Normalizer, PluginFamily, Registry, RegistryEntry, RegistryTemplate, emit_registry,
    load_catalog, load_plugin, merge_modules, mock, render_artifact_map,
    render_require_map, write_generated,
};
use tracing::{error, info, warn};

use crate::artifact::run_artifact_builder;
use crate::report::{FamilyReport, KeyOutcome, RunReport, StepOutcome};
use crate::require_map::{catalog_require_map, directory_require_map};

/// Step names used in [`RunReport::steps`].
pub const STEP_CATALOGS: &str = "catalogs";
pub const STEP_ARTIFACT: &str = "artifact";
pub const STEP_LIQUIDATIONS: &str = "liquidations";
pub const STEP_EMISSIONS: &str = "emissions";

/// Per-run switches layered over the configuration.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Restrict family registries to these names. Empty means all.
    pub only: Vec<String>,
    /// Skip writing the artifact map and running the builder.
    pub skip_artifact: bool,
}

/// Drives one build run over a validated configuration.
pub struct Driver<'a> {
    config: &'a RegforgeConfig,
    options: BuildOptions,
    loader: Option<&'a dyn ModuleLoader>,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a RegforgeConfig) -> Self {
        Self {
            config,
            options: BuildOptions::default(),
            loader: None,
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Use `loader` for every family instead of reading descriptor files.
    pub fn with_loader(mut self, loader: &'a dyn ModuleLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    fn output_dir(&self) -> &Path {
        Path::new(&self.config.general.output_dir)
    }

    /// Run every enabled step and report what happened.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        info!(output_dir = %self.output_dir().display(), "starting registry build");

        self.run_catalog_steps(&mut report);
        self.run_directory_map(STEP_LIQUIDATIONS, &self.config.liquidations, &mut report);

        let normalizer = normalizer_for(&self.config.families.normalize);
        for family in self.families() {
            let family_report = self.build_family(&family, normalizer.as_ref());
            report.families.push(family_report);
        }

        self.run_directory_map(STEP_EMISSIONS, &self.config.emissions, &mut report);

        info!(
            families = report.families.len(),
            failed_keys = report.failed_keys(),
            "registry build finished"
        );
        report
    }

    /// Families selected for this run, in configured order.
    pub fn families(&self) -> Vec<PluginFamily> {
        let families = &self.config.families;
        let descriptor_root = families.descriptor_dir.as_deref().map(Path::new);
        families
            .names
            .iter()
            .filter(|name| self.options.only.is_empty() || self.options.only.contains(name))
            .map(|name| {
                PluginFamily::new(
                    name,
                    Path::new(&families.source_dir),
                    descriptor_root,
                    &families.package,
                    &families.code_url,
                    self.output_dir(),
                    &families.output_suffix,
                )
            })
            .collect()
    }

    /// List, load, mock, and emit one family.
    pub fn build_family(&self, family: &PluginFamily, normalizer: &dyn Normalizer) -> FamilyReport {
        let settings = &self.config.families;
        let mut report = FamilyReport::new(&family.name, family.output_path.clone());

        let options = ListOptions::for_family(
            settings.exclude.clone(),
            settings.extensions.clone(),
            self.config.general.sort_entries,
        );
        let entries = match family.list_plugins(&options) {
            Ok(entries) => entries,
            Err(e) => {
                error!(family = %family.name, error = %e, "family aborted");
                report.abort(e);
                return report;
            }
        };

        let fs_loader;
        let loader: &dyn ModuleLoader = match self.loader {
            Some(loader) => loader,
            None => {
                fs_loader = FsModuleLoader::new(&family.descriptor_dir);
                &fs_loader
            }
        };

        let mut registry = Registry::new(&family.name);
        for entry in entries {
            let module_path = family.module_path(&entry.key);
            let request = LoadRequest {
                family: &family.name,
                key: &entry.key,
                entry: &entry.name,
                module_path: &module_path,
            };
            let mut outcome = KeyOutcome::pending(entry.key.clone(), entry.name.as_str());

            match load_plugin(loader, normalizer, &request, settings.max_value_depth) {
                Ok(module) => {
                    let replaced = registry.insert(RegistryEntry {
                        key: entry.key.clone(),
                        module_file_path: module_path.clone(),
                        module: mock(module),
                        code_path: family.code_path(&entry.name),
                    });
                    if replaced.is_some() {
                        warn!(
                            family = %family.name,
                            key = %entry.key,
                            entry = %entry.name,
                            "duplicate plugin key, later entry replaces earlier one"
                        );
                    }
                    outcome.succeed();
                }
                Err(e) => {
                    error!(
                        family = %family.name,
                        key = %entry.key,
                        scope = %e.scope(),
                        error = %e,
                        "failed to load plugin"
                    );
                    outcome.fail(e);
                }
            }
            report.outcomes.push(outcome);
        }

        let template = RegistryTemplate {
            type_name: &settings.type_name,
            type_module: &settings.type_module,
        };
        match emit_registry(&registry, &template, &family.output_path) {
            Ok(()) => {
                info!(
                    family = %family.name,
                    entries = registry.len(),
                    path = %family.output_path.display(),
                    "wrote family registry"
                );
                report.complete();
            }
            Err(e) => {
                error!(family = %family.name, error = %e, "family aborted");
                report.abort(e);
            }
        }
        report
    }

    fn run_catalog_steps(&self, report: &mut RunReport) {
        let catalogs = &self.config.catalogs;
        if !catalogs.enabled {
            report.record_step(STEP_CATALOGS, skipped("disabled in configuration"));
            report.record_step(STEP_ARTIFACT, skipped("catalogs disabled"));
            return;
        }

        let modules = match self.merged_catalog_modules() {
            Ok(modules) => modules,
            Err(e) => {
                error!(step = STEP_CATALOGS, error = %e, "catalog step failed");
                report.record_step(STEP_CATALOGS, StepOutcome::Failed { error: e });
                report.record_step(STEP_ARTIFACT, skipped("catalogs unavailable"));
                return;
            }
        };

        let map = catalog_require_map(&modules, &catalogs.package);
        let path = self.output_dir().join(&catalogs.output_file);
        let outcome = write_step(STEP_CATALOGS, &path, &render_require_map(&map), map.len());
        report.record_step(STEP_CATALOGS, outcome);

        let artifact = &self.config.artifact;
        if !artifact.enabled || self.options.skip_artifact {
            report.record_step(STEP_ARTIFACT, skipped("disabled for this run"));
            return;
        }

        let map_path = self.output_dir().join(&artifact.map_file);
        let written = render_artifact_map(&map)
            .map_err(|e| RegforgeError::EmitFailure {
                path: map_path.clone(),
                source: e.into(),
            })
            .and_then(|text| write_generated(&map_path, &text))
            .and_then(|()| run_artifact_builder(&artifact.command, &map_path));
        let outcome = match written {
            Ok(()) => StepOutcome::Written {
                path: map_path,
                entries: map.len(),
            },
            Err(e) => {
                error!(step = STEP_ARTIFACT, error = %e, "artifact step failed, continuing");
                StepOutcome::Failed { error: e }
            }
        };
        report.record_step(STEP_ARTIFACT, outcome);
    }

    fn merged_catalog_modules(&self) -> Result<Vec<String>, RegforgeError> {
        let catalogs = &self.config.catalogs;
        let protocols = load_catalog(Path::new(&catalogs.protocols))?;
        let treasuries = load_catalog(Path::new(&catalogs.treasuries))?;
        let entities = load_catalog(Path::new(&catalogs.entities))?;
        Ok(merge_modules([
            protocols.as_slice(),
            treasuries.as_slice(),
            entities.as_slice(),
        ]))
    }

    fn run_directory_map(&self, step: &str, config: &RequireMapConfig, report: &mut RunReport) {
        if !config.enabled {
            report.record_step(step, skipped("disabled in configuration"));
            return;
        }

        let outcome = match directory_require_map(config, self.config.general.sort_entries) {
            Ok(map) => {
                let path = self.output_dir().join(&config.output_file);
                write_step(step, &path, &render_require_map(&map), map.len())
            }
            Err(e) => {
                error!(step, error = %e, "require map step failed");
                StepOutcome::Failed { error: e }
            }
        };
        report.record_step(step, outcome);
    }
}

/// Build the normalization hook described by `config`.
pub fn normalizer_for(config: &NormalizeConfig) -> Box<dyn Normalizer> {
    if !config.enabled {
        return Box::new(NoopNormalizer);
    }
    let mut defaults = ModuleDefaults::new();
    for (key, value) in &config.defaults {
        defaults = defaults.with_default(key.as_str(), value.clone());
    }
    if let Some(nested_key) = &config.nested_key {
        defaults = defaults.with_nested(
            nested_key.as_str(),
            config
                .nested_defaults
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone())),
        );
    }
    Box::new(defaults)
}

/// Run a whole build with descriptor files from disk.
pub fn run_build(config: &RegforgeConfig, options: BuildOptions) -> RunReport {
    Driver::new(config).with_options(options).run()
}

fn write_step(step: &str, path: &Path, contents: &str, entries: usize) -> StepOutcome {
    match write_generated(path, contents) {
        Ok(()) => {
            info!(step, entries, path = %path.display(), "wrote require map");
            StepOutcome::Written {
                path: path.to_path_buf(),
                entries,
            }
        }
        Err(e) => {
            error!(step, error = %e, "require map step failed");
            StepOutcome::Failed { error: e }
        }
    }
}

fn skipped(reason: &str) -> StepOutcome {
    StepOutcome::Skipped {
        reason: reason.to_string(),
    }
}
