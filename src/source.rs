//! Name-to-component lookup
//!
//! A [`ComponentSource`] resolves dependency names to component instances.
//! The installer only ever reads from it; the components themselves are
//! owned by whoever populated the source (usually a [`crate::project::Project`]).

use std::collections::HashMap;
use std::sync::Arc;

use crate::component::Component;
use crate::error::{CinstallError, Result};

/// Lookup surface over a fixed collection of components
pub trait ComponentSource: Send + Sync {
    /// The component with the given name, if there is one
    fn get_component_if_exists(&self, name: &str) -> Option<Arc<Component>>;

    /// Resolve every name, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CinstallError::NoSuchComponent`] for the first name that
    /// does not resolve.
    fn get_components(&self, names: &[String]) -> Result<Vec<Arc<Component>>> {
        names
            .iter()
            .map(|name| {
                self.get_component_if_exists(name)
                    .ok_or_else(|| CinstallError::NoSuchComponent { name: name.clone() })
            })
            .collect()
    }
}

/// Ordered, name-indexed collection of components
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: Vec<Arc<Component>>,
    by_name: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Build a registry. Later components shadow earlier ones with the
    /// same name.
    pub fn new(components: Vec<Arc<Component>>) -> Self {
        let by_name = components
            .iter()
            .enumerate()
            .map(|(index, component)| (component.name().to_string(), index))
            .collect();
        Self {
            components,
            by_name,
        }
    }

    /// All components in insertion order
    pub fn components(&self) -> &[Arc<Component>] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentSource for ComponentRegistry {
    fn get_component_if_exists(&self, name: &str) -> Option<Arc<Component>> {
        self.by_name
            .get(name)
            .map(|&index| Arc::clone(&self.components[index]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_fixtures::{ProbeKind, component};

    fn registry() -> ComponentRegistry {
        ComponentRegistry::new(vec![
            component("core", ProbeKind::new()),
            component("util", ProbeKind::new()),
        ])
    }

    #[test]
    fn test_get_component_if_exists() {
        let registry = registry();
        assert_eq!(
            registry.get_component_if_exists("util").unwrap().name(),
            "util"
        );
        assert!(registry.get_component_if_exists("ghost").is_none());
    }

    #[test]
    fn test_get_components_preserves_order() {
        let registry = registry();
        let names = vec!["util".to_string(), "core".to_string()];
        let found = registry.get_components(&names).unwrap();
        let found: Vec<&str> = found.iter().map(|c| c.name()).collect();
        assert_eq!(found, vec!["util", "core"]);
    }

    #[test]
    fn test_get_components_reports_missing_name() {
        let registry = registry();
        let names = vec!["core".to_string(), "ghost".to_string()];
        let result = registry.get_components(&names);
        match result {
            Err(CinstallError::NoSuchComponent { name }) => assert_eq!(name, "ghost"),
            other => panic!("Expected NoSuchComponent, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_len() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert!(ComponentRegistry::default().is_empty());
    }
}
