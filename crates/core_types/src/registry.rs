use std::sync::Arc;

/// What a type descriptor derives from. Only `Element` descriptors can name a
/// custom tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeBase {
    Element,
    Other,
}

/// Named type descriptor standing in for a custom element constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementType {
    name: Arc<str>,
    base: TypeBase,
}

impl ElementType {
    pub fn element(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            base: TypeBase::Element,
        }
    }

    pub fn other(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            base: TypeBase::Other,
        }
    }

    pub fn of<T: CustomElement>() -> Self {
        Self::element(T::NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> TypeBase {
        self.base
    }

    pub fn is_element(&self) -> bool {
        self.base == TypeBase::Element
    }
}

/// Rust types usable as custom element descriptors.
pub trait CustomElement {
    /// Type name the tag identifier is derived from, e.g. `"RootElement"`.
    const NAME: &'static str;
}

/// Process-wide named-type registry owned by the host environment.
///
/// Registration is idempotent: registering an identifier that is already
/// present is a no-op, not an error.
pub trait TypeRegistry: Send + Sync {
    /// `name` is the lowercase tag identifier.
    fn has(&self, name: &str) -> bool;
    /// Returns `true` when `name` was newly registered.
    fn register(&self, name: &str, ty: &ElementType) -> bool;
}
