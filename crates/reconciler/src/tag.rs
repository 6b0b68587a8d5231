//! Tag identity: canonical uppercase identifiers for declared tags.
//!
//! Plain names are uppercased. Type descriptors derive a compound name from
//! their type name (`MyButton` → `MY-BUTTON`) and are registered in the host's
//! type registry under the lowercase form the first time they are resolved.

use crate::error::{NamingError, NamingFailure};
use core_types::{CustomElement, ElementType, TypeRegistry};
use std::fmt;
use std::sync::Arc;

/// Tags that never own children and therefore never open a scope.
const VOID_TAGS: [&str; 13] = [
    "AREA", "BASE", "BR", "COL", "HR", "IMG", "INPUT", "LINK", "META", "PARAM", "SOURCE", "TRACK",
    "WBR",
];

/// Declared tag: a plain element name or a custom element type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Name(Arc<str>),
    Type(ElementType),
}

impl Tag {
    pub fn custom<T: CustomElement>() -> Self {
        Tag::Type(ElementType::of::<T>())
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::Name(Arc::from(name))
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::Name(Arc::from(name))
    }
}

impl From<ElementType> for Tag {
    fn from(ty: ElementType) -> Self {
        Tag::Type(ty)
    }
}

impl From<&ElementType> for Tag {
    fn from(ty: &ElementType) -> Self {
        Tag::Type(ty.clone())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Name(name) => f.write_str(name),
            Tag::Type(ty) => f.write_str(ty.name()),
        }
    }
}

/// Canonical uppercase tag identifier used for identity comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName(Arc<str>);

impl TagName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.as_str())
    }

    /// Lowercase form used as the registry key.
    pub fn registry_name(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for TagName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// Pure derivation of the tag identifier; never touches a registry.
pub fn tag_identity(tag: &Tag) -> Result<TagName, NamingError> {
    match tag {
        Tag::Name(name) => {
            if name.is_empty() {
                return Err(NamingError {
                    input: String::new(),
                    reason: NamingFailure::Empty,
                });
            }
            Ok(TagName(Arc::from(name.to_uppercase())))
        }
        Tag::Type(ty) if ty.is_element() => derive_custom_tag(ty.name()),
        Tag::Type(ty) => Err(NamingError {
            input: ty.name().to_string(),
            reason: NamingFailure::NotAnElementType,
        }),
    }
}

/// Derive a compound tag identifier from a type name.
///
/// A `-` goes before every uppercase letter that starts a lowercase run or
/// ends the name (`HTMLButton` → `HTML-BUTTON`, `ABC` → `AB-C`). Runs of `-`
/// collapse and leading/trailing `-` are trimmed. The result must contain a
/// `-`.
pub fn derive_custom_tag(type_name: &str) -> Result<TagName, NamingError> {
    if type_name.is_empty() {
        return Err(NamingError {
            input: String::new(),
            reason: NamingFailure::Empty,
        });
    }
    let chars: Vec<char> = type_name.chars().collect();
    let mut dashed = String::with_capacity(type_name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        let boundary = ch.is_ascii_uppercase()
            && chars.get(i + 1).is_none_or(|next| next.is_ascii_lowercase());
        if (boundary || ch == '-') && !dashed.ends_with('-') {
            dashed.push('-');
        }
        if ch != '-' {
            dashed.push(ch);
        }
    }
    let trimmed = dashed.trim_matches('-');
    if !trimmed.contains('-') {
        return Err(NamingError {
            input: type_name.to_string(),
            reason: NamingFailure::MissingSeparator {
                derived: trimmed.to_lowercase(),
            },
        });
    }
    Ok(TagName(Arc::from(trimmed.to_uppercase())))
}

/// Resolves tags and makes sure custom element types are registered exactly
/// once per identifier.
#[derive(Clone)]
pub struct TagResolver {
    registry: Arc<dyn TypeRegistry>,
}

impl TagResolver {
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, tag: &Tag) -> Result<TagName, NamingError> {
        let name = tag_identity(tag)?;
        if let Tag::Type(ty) = tag {
            let key = name.registry_name();
            if !self.registry.has(&key) && self.registry.register(&key, ty) {
                log::debug!(target: "reconciler.ops", "registered <{key}> for type {}", ty.name());
            }
        }
        Ok(name)
    }
}

impl fmt::Debug for TagResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Tag, TagResolver, derive_custom_tag, tag_identity};
    use crate::error::NamingFailure;
    use core_types::{ElementType, TypeRegistry};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CountingRegistry {
        defined: Mutex<HashMap<String, ElementType>>,
        calls: Mutex<usize>,
    }

    impl TypeRegistry for CountingRegistry {
        fn has(&self, name: &str) -> bool {
            self.defined.lock().unwrap().contains_key(name)
        }

        fn register(&self, name: &str, ty: &ElementType) -> bool {
            *self.calls.lock().unwrap() += 1;
            self.defined
                .lock()
                .unwrap()
                .insert(name.to_string(), ty.clone())
                .is_none()
        }
    }

    #[test]
    fn plain_names_are_uppercased() {
        let name = tag_identity(&Tag::from("div")).unwrap();
        assert_eq!(name.as_str(), "DIV");
        assert!(!name.is_void());
        assert!(tag_identity(&Tag::from("img")).unwrap().is_void());
    }

    #[test]
    fn type_names_split_on_uppercase_boundaries() {
        for (input, expected) in [
            ("MyButton", "MY-BUTTON"),
            ("RootElement", "ROOT-ELEMENT"),
            ("HTMLButton", "HTML-BUTTON"),
            ("FancyInputField", "FANCY-INPUT-FIELD"),
            ("Fancy-Button", "FANCY-BUTTON"),
            ("ABC", "AB-C"),
        ] {
            assert_eq!(derive_custom_tag(input).unwrap().as_str(), expected, "{input}");
        }
    }

    #[test]
    fn single_word_type_names_are_rejected() {
        for input in ["Button", "button", "Widget"] {
            let err = derive_custom_tag(input).unwrap_err();
            assert_eq!(err.input, input);
            assert!(matches!(err.reason, NamingFailure::MissingSeparator { .. }));
        }
    }

    #[test]
    fn only_ascii_capitals_start_a_word() {
        let err = derive_custom_tag("MyÄ").unwrap_err();
        assert!(matches!(err.reason, NamingFailure::MissingSeparator { .. }));
        assert_eq!(derive_custom_tag("MyÄpfelButton").unwrap().as_str(), "MYÄPFEL-BUTTON");
    }

    #[test]
    fn non_element_types_and_empty_names_fail() {
        let err = tag_identity(&Tag::Type(ElementType::other("MyWidget"))).unwrap_err();
        assert_eq!(err.reason, NamingFailure::NotAnElementType);
        assert!(err.to_string().contains("MyWidget"));

        let err = tag_identity(&Tag::from("")).unwrap_err();
        assert_eq!(err.reason, NamingFailure::Empty);
    }

    #[test]
    fn resolver_registers_each_type_once() {
        let registry = Arc::new(CountingRegistry::default());
        let resolver = TagResolver::new(registry.clone());
        let tag = Tag::Type(ElementType::element("MyButton"));
        for _ in 0..3 {
            assert_eq!(resolver.resolve(&tag).unwrap().as_str(), "MY-BUTTON");
        }
        assert_eq!(*registry.calls.lock().unwrap(), 1);
        assert!(registry.has("my-button"));
    }

    #[test]
    fn resolver_never_registers_plain_names() {
        let registry = Arc::new(CountingRegistry::default());
        let resolver = TagResolver::new(registry.clone());
        resolver.resolve(&Tag::from("my-button")).unwrap();
        assert_eq!(*registry.calls.lock().unwrap(), 0);
    }
}
