//! Declared properties and the per-node property differencer.
//!
//! Key routing:
//! - `style`: merged sub-key by sub-key into the live style; never cleared.
//! - `className` and `on*`: live properties, so handler identity survives.
//! - `$name`: live property `name` (for values an attribute cannot carry).
//! - anything else: string-coerced markup attribute.
//!
//! The keys applied on the previous pass live on the host node. A key that was
//! applied before but is no longer declared is cleared (attribute removed,
//! property removed), except `style`.

use core_types::{EventHandler, HostTree, PropValue, StyleMap};
use std::sync::Arc;

/// Ordered property mapping with unique keys. Setting an existing key
/// replaces its value in place.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: Vec<(Arc<str>, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn attr(self, name: &str, value: impl Into<PropValue>) -> Self {
        self.set(name, value)
    }

    pub fn class_name(self, value: &str) -> Self {
        self.set("className", value)
    }

    pub fn style(self, style: StyleMap) -> Self {
        self.set("style", style)
    }

    /// `on("click", ..)` declares the `onclick` handler property.
    pub fn on(self, event: &str, handler: EventHandler) -> Self {
        let key = if event.starts_with("on") {
            event.to_string()
        } else {
            format!("on{event}")
        };
        self.set(&key, handler)
    }

    /// Live property escape hatch: declares `$name`.
    pub fn prop(self, name: &str, value: impl Into<PropValue>) -> Self {
        self.set(&format!("${name}"), value)
    }

    pub fn insert(&mut self, key: &str, value: PropValue) {
        match self.entries.iter_mut().find(|(k, _)| k.as_ref() == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((Arc::from(key), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k.as_ref(), v.into());
        }
        props
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropSlot<'k> {
    Style,
    Property(&'k str),
    Attribute(&'k str),
}

fn classify(key: &str) -> PropSlot<'_> {
    if key == "style" {
        PropSlot::Style
    } else if key == "className" || key.starts_with("on") {
        PropSlot::Property(key)
    } else if let Some(name) = key.strip_prefix('$') {
        PropSlot::Property(name)
    } else {
        PropSlot::Attribute(key)
    }
}

/// Apply the minimal set of writes that brings `node` from its previously
/// applied keys to `props`, then record `props`' keys as the new cache.
pub fn apply_props<H: HostTree>(host: &mut H, node: H::Node, props: &Props) {
    let previous: Vec<Arc<str>> = host.prop_keys(node).to_vec();

    for (key, value) in props.iter() {
        apply_one(host, node, key, Some(value));
    }
    for key in &previous {
        if props.get(key).is_none() {
            apply_one(host, node, key, None);
        }
    }

    let keys = props.iter().map(|(k, _)| Arc::clone(k)).collect();
    host.set_prop_keys(node, keys);
}

fn apply_one<H: HostTree>(host: &mut H, node: H::Node, key: &str, value: Option<&PropValue>) {
    match classify(key) {
        PropSlot::Style => {
            if let Some(value) = value {
                merge_style(host, node, value);
            }
        }
        PropSlot::Property(name) => match value {
            Some(value) => {
                if host.property(node, name).is_some_and(|live| live.same(value)) {
                    return;
                }
                log::trace!(target: "reconciler.props", "{node:?}: property {name} = {value:?}");
                host.set_property(node, name, value.clone());
            }
            None => {
                if host.property(node, name).is_some() {
                    log::trace!(target: "reconciler.props", "{node:?}: clear property {name}");
                    host.remove_property(node, name);
                }
            }
        },
        PropSlot::Attribute(name) => match value {
            Some(value) => {
                let text = value.to_attr_string();
                if host.attribute(node, name) == Some(text.as_str()) {
                    return;
                }
                log::trace!(target: "reconciler.props", "{node:?}: attribute {name}={text:?}");
                host.set_attribute(node, name, &text);
            }
            None => {
                if host.attribute(node, name).is_some() {
                    log::trace!(target: "reconciler.props", "{node:?}: remove attribute {name}");
                    host.remove_attribute(node, name);
                }
            }
        },
    }
}

fn merge_style<H: HostTree>(host: &mut H, node: H::Node, value: &PropValue) {
    let parsed;
    let style = match value {
        PropValue::Style(style) => style,
        PropValue::Str(text) => {
            parsed = StyleMap::parse(text);
            &parsed
        }
        other => {
            log::warn!(target: "reconciler.props", "{node:?}: ignoring non-style value for style: {other:?}");
            return;
        }
    };
    for (name, value) in style.iter() {
        if host.style_property(node, name) == Some(value) {
            continue;
        }
        log::trace!(target: "reconciler.props", "{node:?}: style {name}: {value}");
        host.set_style_property(node, name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::{PropSlot, Props, apply_props, classify};
    use core_types::{EventHandler, HostTree, PropValue, StyleMap};
    use dom::Document;

    fn element(doc: &mut Document) -> dom::NodeKey {
        let root = doc.root();
        let el = doc.create_element("DIV");
        doc.append_child(root, el);
        doc.reset_stats();
        el
    }

    #[test]
    fn keys_route_to_their_slots() {
        assert_eq!(classify("style"), PropSlot::Style);
        assert_eq!(classify("className"), PropSlot::Property("className"));
        assert_eq!(classify("onclick"), PropSlot::Property("onclick"));
        assert_eq!(classify("$value"), PropSlot::Property("value"));
        assert_eq!(classify("id"), PropSlot::Attribute("id"));
        assert_eq!(classify("data-x"), PropSlot::Attribute("data-x"));
    }

    #[test]
    fn identical_values_are_not_rewritten() {
        let mut doc = Document::new();
        let el = element(&mut doc);
        let handler = EventHandler::new(|_| {});
        let props = Props::new()
            .attr("id", "a")
            .attr("tabindex", 3)
            .class_name("card")
            .on("click", handler)
            .prop("value", "x")
            .style(StyleMap::new().with("color", "red"));

        apply_props(&mut doc, el, &props);
        let first = doc.stats();
        assert_eq!(first.attribute_writes, 2);
        assert_eq!(first.property_writes, 3);
        assert_eq!(first.style_writes, 1);

        doc.reset_stats();
        apply_props(&mut doc, el, &props);
        assert_eq!(doc.stats().writes(), 0);
    }

    #[test]
    fn fresh_handler_is_rewritten() {
        let mut doc = Document::new();
        let el = element(&mut doc);
        apply_props(&mut doc, el, &Props::new().on("click", EventHandler::new(|_| {})));
        doc.reset_stats();
        apply_props(&mut doc, el, &Props::new().on("click", EventHandler::new(|_| {})));
        assert_eq!(doc.stats().property_writes, 1);
    }

    #[test]
    fn style_merges_and_never_clears() {
        let mut doc = Document::new();
        let el = element(&mut doc);
        apply_props(
            &mut doc,
            el,
            &Props::new().style(StyleMap::new().with("color", "red")),
        );
        apply_props(
            &mut doc,
            el,
            &Props::new().style(StyleMap::new().with("background", "blue")),
        );
        assert_eq!(doc.style_property(el, "color"), Some("red"));
        assert_eq!(doc.style_property(el, "background"), Some("blue"));

        apply_props(&mut doc, el, &Props::new());
        assert_eq!(doc.style_property(el, "color"), Some("red"));
    }

    #[test]
    fn style_text_is_parsed_and_merged() {
        let mut doc = Document::new();
        let el = element(&mut doc);
        apply_props(&mut doc, el, &Props::new().set("style", "color: red; margin: 0"));
        assert_eq!(doc.style_property(el, "color"), Some("red"));
        assert_eq!(doc.style_property(el, "margin"), Some("0"));

        doc.reset_stats();
        apply_props(&mut doc, el, &Props::new().set("style", PropValue::Bool(true)));
        assert_eq!(doc.stats().writes(), 0);
    }

    #[test]
    fn undeclared_keys_are_cleared() {
        let mut doc = Document::new();
        let el = element(&mut doc);
        apply_props(
            &mut doc,
            el,
            &Props::new().attr("id", "a").class_name("x").prop("value", 1),
        );
        apply_props(&mut doc, el, &Props::new().attr("title", "t"));

        assert_eq!(doc.attribute(el, "id"), None);
        assert_eq!(doc.attribute(el, "class"), None);
        assert!(doc.property(el, "value").is_none());
        assert_eq!(doc.attribute(el, "title"), Some("t"));
        assert_eq!(doc.prop_keys(el).len(), 1);
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let props = Props::new().attr("id", "a").attr("id", "b");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("id").and_then(PropValue::as_str), Some("b"));

        let collected: Props = [("id", "x"), ("title", "y"), ("id", "z")].into_iter().collect();
        let keys: Vec<&str> = collected.iter().map(|(k, _)| k.as_ref()).collect();
        assert_eq!(keys, ["id", "title"]);
    }
}
