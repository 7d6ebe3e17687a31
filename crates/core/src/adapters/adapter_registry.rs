//! Explicit adapter registry.
//!
//! Assembled once at process start from a map of platform id to adapter and
//! passed into the services that need it. There is deliberately no global
//! singleton and no directory auto-discovery: substitution in tests is a
//! constructor argument.

use std::collections::HashMap;
use std::sync::Arc;

use super::adapter_traits::PlatformAdapter;
use crate::errors::{Error, Result};

#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from an explicit adapter list, keyed by
    /// `PlatformAdapter::platform`.
    pub fn from_adapters(adapters: impl IntoIterator<Item = Arc<dyn PlatformAdapter>>) -> Self {
        let mut registry = Self::new();
        for adapter in adapters {
            registry.register(adapter);
        }
        registry
    }

    /// Registers an adapter, replacing any previous one for the same platform.
    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(adapter.platform().to_string(), adapter);
    }

    /// Resolves the adapter for a platform id.
    pub fn get(&self, platform: &str) -> Result<Arc<dyn PlatformAdapter>> {
        self.adapters
            .get(platform)
            .cloned()
            .ok_or_else(|| Error::UnknownPlatform(platform.to_string()))
    }

    pub fn platforms(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}
