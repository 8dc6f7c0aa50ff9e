//! Type registry mapping 4-byte tags back to window and button kinds.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::button::ButtonKind;
use crate::token::{type_tag, TypeTag};
use crate::window::WindowDescriptor;

/// Registration failures. These are startup-time integrity errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type {0} is already registered")]
    Duplicate(String),

    #[error("type {incoming} collides with {existing} on tag {tag:02x?}")]
    Collision {
        existing: String,
        incoming: String,
        tag: TypeTag,
    },

    #[error("window {0} has no tabs")]
    NoTabs(String),
}

/// Registry of window and button kinds.
///
/// Built once at startup and shared read-only by every event.
pub struct Registry {
    /// Every claimed tag with the type name that claimed it.
    names: HashMap<TypeTag, String>,
    windows: HashMap<TypeTag, Arc<WindowDescriptor>>,
    buttons: HashMap<TypeTag, ButtonKind>,
}

impl Registry {
    /// Create a registry holding the built-in button kinds.
    pub fn new() -> Self {
        let mut registry = Self {
            names: HashMap::new(),
            windows: HashMap::new(),
            buttons: HashMap::new(),
        };
        for kind in ButtonKind::ALL {
            registry
                .names
                .insert(kind.tag(), kind.type_name().to_string());
            registry.buttons.insert(kind.tag(), kind);
        }
        registry
    }

    /// Register a window kind.
    ///
    /// Fails if the name was registered before or if its tag collides with
    /// another registered type.
    pub fn register_window(
        &mut self,
        descriptor: WindowDescriptor,
    ) -> Result<Arc<WindowDescriptor>, RegistryError> {
        if descriptor.tabs().is_empty() {
            return Err(RegistryError::NoTabs(descriptor.name().to_string()));
        }
        self.claim(descriptor.name(), descriptor.tag())?;

        info!(
            "Registering window: {} ({} tabs)",
            descriptor.name(),
            descriptor.tabs().len()
        );
        let descriptor = Arc::new(descriptor);
        self.windows.insert(descriptor.tag(), descriptor.clone());
        Ok(descriptor)
    }

    fn claim(&mut self, name: &str, tag: TypeTag) -> Result<(), RegistryError> {
        if let Some(existing) = self.names.get(&tag) {
            if existing == name {
                return Err(RegistryError::Duplicate(name.to_string()));
            }
            return Err(RegistryError::Collision {
                existing: existing.clone(),
                incoming: name.to_string(),
                tag,
            });
        }
        self.names.insert(tag, name.to_string());
        Ok(())
    }

    /// Look up a window kind by tag.
    pub fn window(&self, tag: TypeTag) -> Option<&Arc<WindowDescriptor>> {
        self.windows.get(&tag)
    }

    /// Look up a window kind by name.
    pub fn window_by_name(&self, name: &str) -> Option<&Arc<WindowDescriptor>> {
        self.windows.get(&type_tag(name))
    }

    /// Look up a button kind by tag.
    pub fn button_kind(&self, tag: TypeTag) -> Option<ButtonKind> {
        self.buttons.get(&tag).copied()
    }

    /// Names of all registered window kinds.
    pub fn window_names(&self) -> Vec<&str> {
        self.windows.values().map(|w| w.name()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::TabBehavior;
    use async_trait::async_trait;

    struct Blank;

    #[async_trait]
    impl TabBehavior for Blank {
        fn name(&self) -> &str {
            "Blank"
        }
    }

    #[test]
    fn test_builtin_buttons_round_trip() {
        let registry = Registry::new();
        for kind in ButtonKind::ALL {
            assert_eq!(registry.button_kind(type_tag(kind.type_name())), Some(kind));
        }
        assert_eq!(registry.button_kind(type_tag("NoSuchButton")), None);
    }

    #[test]
    fn test_register_window() {
        let mut registry = Registry::new();
        let descriptor = registry
            .register_window(WindowDescriptor::new("SettingsWindow").tab(Blank))
            .unwrap();

        let found = registry.window(type_tag("SettingsWindow")).unwrap();
        assert!(Arc::ptr_eq(found, &descriptor));
        assert!(registry.window_by_name("SettingsWindow").is_some());
        assert_eq!(registry.window_names(), vec!["SettingsWindow"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = Registry::new();
        registry
            .register_window(WindowDescriptor::new("SettingsWindow").tab(Blank))
            .unwrap();
        let result = registry.register_window(WindowDescriptor::new("SettingsWindow").tab(Blank));
        assert_eq!(
            result.err(),
            Some(RegistryError::Duplicate("SettingsWindow".to_string()))
        );

        let result = registry.register_window(WindowDescriptor::new("SimpleButton").tab(Blank));
        assert!(matches!(result, Err(RegistryError::Duplicate(_))));
    }

    #[test]
    fn test_collision_rejected() {
        let mut registry = Registry::new();
        let tag = type_tag("SimpleButton");
        let result = registry.claim("SomethingElse", tag);
        assert_eq!(
            result,
            Err(RegistryError::Collision {
                existing: "SimpleButton".to_string(),
                incoming: "SomethingElse".to_string(),
                tag,
            })
        );
    }

    #[test]
    fn test_window_without_tabs_rejected() {
        let mut registry = Registry::new();
        let result = registry.register_window(WindowDescriptor::new("Empty"));
        assert!(matches!(result, Err(RegistryError::NoTabs(_))));
    }
}
