use core_types::{ElementType, TypeRegistry};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Custom element registry shared (through `Arc`) by every reconciler of the
/// process. Safe to use from reconcilers running on different threads.
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    defined: RwLock<HashMap<String, ElementType>>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ElementType> {
        self.defined
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.defined
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeRegistry for CustomElementRegistry {
    fn has(&self, name: &str) -> bool {
        self.defined
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn register(&self, name: &str, ty: &ElementType) -> bool {
        let mut defined = self.defined.write().unwrap_or_else(PoisonError::into_inner);
        if defined.contains_key(name) {
            return false;
        }
        defined.insert(name.to_string(), ty.clone());
        log::debug!(target: "dom.registry", "defined custom element <{name}> for {}", ty.name());
        true
    }
}
