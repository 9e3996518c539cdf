// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory module loader for deterministic tests.
//!
//! `MockLoader` serves pre-registered module documents keyed by logical
//! module path and records every request it receives.

use std::cell::RefCell;
use std::collections::HashMap;

use regforge_core::{PluginValue, RegforgeError, ValueMap};
use regforge_plugin::{LoadRequest, ModuleLoader};

enum Canned {
    Module(PluginValue),
    Failure(String),
}

/// A loader backed by a map of module path to module document.
///
/// Unknown module paths fail with `LoadFailure`.
#[derive(Default)]
pub struct MockLoader {
    modules: HashMap<String, Canned>,
    requests: RefCell<Vec<String>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `{"default": export}` for `module_path`.
    pub fn with_export(mut self, module_path: &str, export: PluginValue) -> Self {
        let mut module = ValueMap::new();
        module.insert("default", export);
        self.modules
            .insert(module_path.to_string(), Canned::Module(module.into()));
        self
    }

    /// Serve a whole module document for `module_path`.
    pub fn with_module(mut self, module_path: &str, module: PluginValue) -> Self {
        self.modules
            .insert(module_path.to_string(), Canned::Module(module));
        self
    }

    /// Fail loading `module_path` with `message`.
    pub fn with_failure(mut self, module_path: &str, message: &str) -> Self {
        self.modules
            .insert(module_path.to_string(), Canned::Failure(message.to_string()));
        self
    }

    /// Module paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ModuleLoader for MockLoader {
    fn load(&self, request: &LoadRequest<'_>) -> Result<PluginValue, RegforgeError> {
        self.requests
            .borrow_mut()
            .push(request.module_path.to_string());
        match self.modules.get(request.module_path) {
            Some(Canned::Module(module)) => Ok(module.clone()),
            Some(Canned::Failure(message)) => {
                Err(RegforgeError::load(request.module_path, message.clone()))
            }
            None => Err(RegforgeError::load(
                request.module_path,
                "no module registered",
            )),
        }
    }
}
