// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for regforge integration tests.
//!
//! Provides fixture plugin trees and an in-memory loader for fast,
//! deterministic tests that never touch a real adapters checkout.
//!
//! # Components
//!
//! - [`TestWorkspace`] - temp directory with plugin sources, descriptors, and catalogs
//! - [`MockLoader`] - in-memory module loader with request capture

pub mod mock_loader;
pub mod workspace;

pub use mock_loader::MockLoader;
pub use workspace::{CatalogKind, TestWorkspace, TestWorkspaceBuilder, callable, object};
