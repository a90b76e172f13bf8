//! Catalog of knowledge stores a session may target.

use crate::error::{ChatError, ChatResult};

/// Stores available before any is created at runtime.
pub const DEFAULT_STORES: [&str; 4] = [
    "default",
    "hydraulic-systems",
    "brake-systems",
    "legacy-trains",
];

/// Ordered set of known store names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCatalog {
    stores: Vec<String>,
}

impl Default for StoreCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_STORES)
    }
}

impl StoreCatalog {
    pub fn new<I, S>(stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self { stores: Vec::new() };
        for store in stores {
            let store = store.into();
            if !store.trim().is_empty() && !catalog.contains(&store) {
                catalog.stores.push(store);
            }
        }
        catalog
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.iter().any(|s| s == name)
    }

    /// Reject names that are not in the catalog.
    pub fn validate(&self, name: &str) -> ChatResult<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(ChatError::UnknownStore(name.to_string()))
        }
    }

    /// Add a store. Returns `false` when it was already known.
    pub fn add(&mut self, name: &str) -> ChatResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::invalid_input("store name must not be empty"));
        }
        if self.contains(name) {
            return Ok(false);
        }
        self.stores.push(name.to_string());
        Ok(true)
    }

    pub fn names(&self) -> &[String] {
        &self.stores
    }
}
