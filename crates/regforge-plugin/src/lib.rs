// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery, loading, mocking, and registry emission.
//!
//! A plugin family is a directory of similarly shaped plugins. The lister
//! turns directory entries into plugin keys, the loader decodes each plugin's
//! descriptor and checks its default export, the mocker replaces callables
//! with a sentinel, and the emitter renders the resulting registry as a
//! static module.

pub mod catalog;
pub mod emit;
pub mod family;
pub mod lister;
pub mod loader;
pub mod mock;
pub mod normalize;
pub mod registry;

pub use catalog::{CatalogRecord, load_catalog, merge_modules};
pub use emit::{
    GENERATED_HEADER, RegistryTemplate, emit_registry, render_artifact_map, render_registry,
    render_require_map, write_generated,
};
pub use family::PluginFamily;
pub use lister::{ListOptions, ListedEntry, drop_shadowed_descriptors, list_entries};
pub use loader::{FsModuleLoader, LoadRequest, ModuleLoader, is_descriptor_file, load_plugin};
pub use mock::{MOCK_SENTINEL, mock, mock_in_place};
pub use normalize::{ModuleDefaults, NoopNormalizer, NormalizeError, Normalizer};
pub use registry::{Registry, RegistryEntry, RequireMap};
