// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome of a build run, per family and per auxiliary step.

use std::path::PathBuf;

use regforge_core::{KeyState, PluginKey, RegforgeError};
use strum::Display;

/// Result of loading one plugin entry.
#[derive(Debug)]
pub struct KeyOutcome {
    pub key: PluginKey,
    /// Raw directory entry the key came from.
    pub entry: String,
    pub state: KeyState,
    pub error: Option<RegforgeError>,
}

impl KeyOutcome {
    pub fn pending(key: PluginKey, entry: impl Into<String>) -> Self {
        Self {
            key,
            entry: entry.into(),
            state: KeyState::Pending,
            error: None,
        }
    }

    pub fn succeed(&mut self) {
        self.state = KeyState::Succeeded;
    }

    pub fn fail(&mut self, error: RegforgeError) {
        self.state = KeyState::Failed;
        self.error = Some(error);
    }
}

/// Terminal state of a family build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FamilyStatus {
    /// Still processing keys.
    Running,
    /// Every key is terminal and the registry was written.
    Complete,
    /// Listing or writing failed; nothing was written for this family.
    Aborted,
}

/// Report for one plugin family.
#[derive(Debug)]
pub struct FamilyReport {
    pub name: String,
    pub status: FamilyStatus,
    pub outcomes: Vec<KeyOutcome>,
    pub output_path: PathBuf,
    /// Family-scoped failure that aborted the family.
    pub error: Option<RegforgeError>,
}

impl FamilyReport {
    pub fn new(name: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            status: FamilyStatus::Running,
            outcomes: Vec::new(),
            output_path,
            error: None,
        }
    }

    pub(crate) fn complete(&mut self) {
        self.status = FamilyStatus::Complete;
    }

    pub(crate) fn abort(&mut self, error: RegforgeError) {
        self.status = FamilyStatus::Aborted;
        self.error = Some(error);
    }

    /// Keys that made it into the registry, in listing order.
    pub fn succeeded(&self) -> impl Iterator<Item = &PluginKey> {
        self.outcomes
            .iter()
            .filter(|o| o.state == KeyState::Succeeded)
            .map(|o| &o.key)
    }

    /// Failed keys with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&PluginKey, &RegforgeError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (&o.key, e)))
    }
}

/// Outcome of a require-map, catalog, or artifact step.
#[derive(Debug)]
pub enum StepOutcome {
    /// A file was written with this many entries.
    Written { path: PathBuf, entries: usize },
    /// The step did not run.
    Skipped { reason: String },
    /// The step failed; later steps still ran.
    Failed { error: RegforgeError },
}

/// A named auxiliary step and how it ended.
#[derive(Debug)]
pub struct StepReport {
    pub name: String,
    pub outcome: StepOutcome,
}

/// Everything that happened during one build run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub families: Vec<FamilyReport>,
}

impl RunReport {
    pub(crate) fn record_step(&mut self, name: &str, outcome: StepOutcome) {
        self.steps.push(StepReport {
            name: name.to_string(),
            outcome,
        });
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.outcome)
    }

    /// Look up a family by name.
    pub fn family(&self, name: &str) -> Option<&FamilyReport> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Number of plugin keys that failed across all families.
    pub fn failed_keys(&self) -> usize {
        self.families.iter().map(|f| f.failed().count()).sum()
    }

    /// True when anything failed at any scope.
    pub fn has_failures(&self) -> bool {
        self.failed_keys() > 0
            || self
                .families
                .iter()
                .any(|f| f.status == FamilyStatus::Aborted)
            || self
                .steps
                .iter()
                .any(|s| matches!(s.outcome, StepOutcome::Failed { .. }))
    }
}
