// crates/tojson-core/src/runtime/inputs.rs
// ============================================================================
// Module: Tojson Input Providers
// Description: Environment-backed and in-memory action input providers.
// Purpose: Resolve named action inputs without reading process state directly.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! GitHub exposes action inputs as `INPUT_<NAME>` environment variables, with
//! spaces replaced by underscores and the name uppercased. Values are trimmed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::interfaces::Environment;
use crate::interfaces::InputProvider;

// ============================================================================
// SECTION: Environment Inputs
// ============================================================================

/// Returns the environment variable name carrying an input.
#[must_use]
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Reads inputs from `INPUT_*` variables of an injected environment.
#[derive(Clone)]
pub struct EnvInputProvider {
    /// Backing environment.
    env: Arc<dyn Environment>,
}

impl EnvInputProvider {
    /// Creates a provider over an environment.
    #[must_use]
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
        }
    }
}

impl InputProvider for EnvInputProvider {
    fn get_input(&self, name: &str) -> Option<String> {
        self.env.var(&input_env_name(name)).map(|value| value.trim().to_string())
    }
}

// ============================================================================
// SECTION: In-Memory Inputs
// ============================================================================

/// In-memory input provider.
#[derive(Debug, Clone, Default)]
pub struct MapInputProvider {
    /// Input values keyed by input name.
    values: BTreeMap<String, String>,
}

impl MapInputProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the provider with an input set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an input.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl InputProvider for MapInputProvider {
    fn get_input(&self, name: &str) -> Option<String> {
        self.values.get(name).map(|value| value.trim().to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapInputProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut provider = Self::new();
        for (name, value) in iter {
            provider.insert(name, value);
        }
        provider
    }
}
