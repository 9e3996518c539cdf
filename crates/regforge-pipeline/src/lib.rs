// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build pipeline for the regforge registry generator.
//!
//! The [`Driver`] sequences the catalog require map, the artifact map and
//! its external builder, the liquidations and emissions require maps, and
//! one registry per plugin family, isolating failures at the narrowest
//! scope and returning a [`RunReport`].

pub mod artifact;
pub mod driver;
pub mod report;
pub mod require_map;

pub use driver::{
    BuildOptions, Driver, STEP_ARTIFACT, STEP_CATALOGS, STEP_EMISSIONS, STEP_LIQUIDATIONS,
    normalizer_for, run_build,
};
pub use report::{FamilyReport, FamilyStatus, KeyOutcome, RunReport, StepOutcome, StepReport};
