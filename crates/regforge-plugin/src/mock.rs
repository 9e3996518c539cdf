// SPDX-FileCopyrightText: 2026 Regforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callable mocking.
//!
//! Replaces every callable in a value tree with a fixed sentinel string so
//! the tree can be serialized into a static registry.

use regforge_core::PluginValue;

/// Placeholder written in place of every callable.
pub const MOCK_SENTINEL: &str = "_lmtf";

/// Return `value` with every callable replaced by [`MOCK_SENTINEL`].
pub fn mock(mut value: PluginValue) -> PluginValue {
    mock_in_place(&mut value);
    value
}

/// Replace every callable inside `value` with [`MOCK_SENTINEL`], in place.
pub fn mock_in_place(value: &mut PluginValue) {
    match value {
        PluginValue::Callable(_) => *value = PluginValue::String(MOCK_SENTINEL.to_string()),
        PluginValue::List(items) => items.iter_mut().for_each(mock_in_place),
        PluginValue::Map(map) => map.values_mut().for_each(mock_in_place),
        PluginValue::Null | PluginValue::Bool(_) | PluginValue::Number(_) | PluginValue::String(_) => {}
    }
}
