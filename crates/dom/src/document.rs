//! Arena-backed document.
//!
//! Invariants:
//! - `NodeKey(0)` is never allocated; keys are never reused, so a handle to a
//!   discarded node stays detectably dead.
//! - A node has at most one parent; sibling links are consistent with the
//!   parent's first/last child links.
//! - Text nodes never have children.
//! - Removing or replacing a node frees its whole subtree.

use core_types::{HostTree, PropValue, StyleMap};
use std::sync::Arc;

/// Stable node identity within one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// Counters for structural and property mutations applied through
/// [`HostTree`]. Reads are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub created: u64,
    pub appended: u64,
    pub replaced: u64,
    pub removed: u64,
    pub attribute_writes: u64,
    pub property_writes: u64,
    pub style_writes: u64,
}

impl MutationStats {
    /// Creations, insertions, replacements and removals.
    pub fn structural(&self) -> u64 {
        self.created + self.appended + self.replaced + self.removed
    }

    pub fn writes(&self) -> u64 {
        self.attribute_writes + self.property_writes + self.style_writes
    }
}

#[derive(Debug)]
pub enum NodeData {
    Fragment,
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
pub struct ElementData {
    tag: Arc<str>,
    attributes: Vec<(Arc<str>, String)>,
    properties: Vec<(Arc<str>, PropValue)>,
    style: StyleMap,
    prop_keys: Vec<Arc<str>>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: Arc::from(tag),
            attributes: Vec::new(),
            properties: Vec::new(),
            style: StyleMap::new(),
            prop_keys: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in first-set order.
    pub fn attributes(&self) -> &[(Arc<str>, String)] {
        &self.attributes
    }

    pub fn properties(&self) -> &[(Arc<str>, PropValue)] {
        &self.properties
    }

    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => self.attributes.push((Arc::from(name), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| k.as_ref() != name);
        self.attributes.len() != before
    }

    fn property(&self, name: &str) -> Option<&PropValue> {
        self.properties
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }
}

#[derive(Debug)]
struct NodeRecord {
    data: NodeData,
    parent: Option<NodeKey>,
    first_child: Option<NodeKey>,
    last_child: Option<NodeKey>,
    prev_sibling: Option<NodeKey>,
    next_sibling: Option<NodeKey>,
}

impl NodeRecord {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    fn allows_children(&self) -> bool {
        matches!(self.data, NodeData::Fragment | NodeData::Element(_))
    }
}

/// Arena of nodes addressed by [`NodeKey`].
///
/// Freed slots are not reused: every created node takes a new slot, so the
/// arena grows with the total number of nodes ever created, not the number
/// alive. A long-lived document under heavy churn should be rebuilt into a
/// fresh `Document` from time to time.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<NodeRecord>>,
    root: NodeKey,
    stats: MutationStats,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeKey::INVALID,
            stats: MutationStats::default(),
        };
        doc.root = doc.insert(NodeData::Fragment);
        doc
    }

    /// The fragment every document starts with.
    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn is_live(&self, key: NodeKey) -> bool {
        self.record(key).is_some()
    }

    /// Number of live nodes, the root fragment included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self, key: NodeKey) -> Option<&NodeData> {
        self.record(key).map(|r| &r.data)
    }

    pub fn element(&self, key: NodeKey) -> Option<&ElementData> {
        match self.data(key)? {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn children(&self, key: NodeKey) -> Children<'_> {
        Children {
            doc: self,
            next: self.record(key).and_then(|r| r.first_child),
        }
    }

    pub fn stats(&self) -> MutationStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = MutationStats::default();
    }

    /// Invoke the `on<event>` handler property of `node`, if any.
    pub fn dispatch(&self, node: NodeKey, event: &str) -> bool {
        let name = format!("on{event}");
        match self.element(node).and_then(|el| el.property(&name)) {
            Some(PropValue::Handler(handler)) => {
                handler.call(event);
                true
            }
            _ => false,
        }
    }

    fn insert(&mut self, data: NodeData) -> NodeKey {
        self.nodes.push(Some(NodeRecord::new(data)));
        NodeKey(self.nodes.len() as u32)
    }

    fn record(&self, key: NodeKey) -> Option<&NodeRecord> {
        if key == NodeKey::INVALID {
            return None;
        }
        self.nodes.get(key.index()).and_then(Option::as_ref)
    }

    fn record_mut(&mut self, key: NodeKey) -> Option<&mut NodeRecord> {
        if key == NodeKey::INVALID {
            return None;
        }
        self.nodes.get_mut(key.index()).and_then(Option::as_mut)
    }

    fn element_mut(&mut self, key: NodeKey) -> Option<&mut ElementData> {
        match &mut self.record_mut(key)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn live_or_warn(&self, key: NodeKey, op: &str) -> bool {
        if self.is_live(key) {
            return true;
        }
        debug_assert!(false, "{op}: node {key:?} is not live");
        log::warn!(target: "dom", "{op}: node {key:?} is not live; ignored");
        false
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.record(key).and_then(|r| r.parent);
        }
        false
    }

    fn can_insert(&self, parent: NodeKey, child: NodeKey, op: &str) -> bool {
        if !self.live_or_warn(parent, op) || !self.live_or_warn(child, op) {
            return false;
        }
        let parent_ok = self.record(parent).is_some_and(NodeRecord::allows_children);
        let detached = self.record(child).is_some_and(|r| r.parent.is_none());
        let acyclic = !self.is_ancestor_or_self(child, parent);
        if parent_ok && detached && acyclic {
            return true;
        }
        debug_assert!(false, "{op}: cannot insert {child:?} under {parent:?}");
        log::warn!(target: "dom", "{op}: cannot insert {child:?} under {parent:?}; ignored");
        false
    }

    /// Unlink `key` from its parent and siblings, keeping its subtree intact.
    fn detach(&mut self, key: NodeKey) {
        let Some(record) = self.record_mut(key) else {
            return;
        };
        let parent = record.parent.take();
        let prev = record.prev_sibling.take();
        let next = record.next_sibling.take();
        match prev {
            Some(prev) => {
                if let Some(r) = self.record_mut(prev) {
                    r.next_sibling = next;
                }
            }
            None => {
                if let Some(r) = parent.and_then(|p| self.record_mut(p)) {
                    r.first_child = next;
                }
            }
        }
        match next {
            Some(next) => {
                if let Some(r) = self.record_mut(next) {
                    r.prev_sibling = prev;
                }
            }
            None => {
                if let Some(r) = parent.and_then(|p| self.record_mut(p)) {
                    r.last_child = prev;
                }
            }
        }
    }

    /// Free a detached subtree.
    fn free_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let Some(record) = self.nodes.get_mut(current.index()).and_then(Option::take) else {
                continue;
            };
            let mut child = record.first_child;
            while let Some(c) = child {
                child = self.record(c).and_then(|r| r.next_sibling);
                stack.push(c);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeKey>,
}

impl Iterator for Children<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let current = self.next?;
        self.next = self.doc.record(current).and_then(|r| r.next_sibling);
        Some(current)
    }
}

impl HostTree for Document {
    type Node = NodeKey;

    fn create_element(&mut self, tag: &str) -> NodeKey {
        self.stats.created += 1;
        self.insert(NodeData::Element(ElementData::new(tag)))
    }

    fn create_text(&mut self, text: &str) -> NodeKey {
        self.stats.created += 1;
        self.insert(NodeData::Text(text.to_string()))
    }

    fn append_child(&mut self, parent: NodeKey, child: NodeKey) {
        if !self.can_insert(parent, child, "append_child") {
            return;
        }
        let last = self.record(parent).and_then(|r| r.last_child);
        if let Some(r) = self.record_mut(child) {
            r.parent = Some(parent);
            r.prev_sibling = last;
        }
        match last {
            Some(last) => {
                if let Some(r) = self.record_mut(last) {
                    r.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(r) = self.record_mut(parent) {
                    r.first_child = Some(child);
                }
            }
        }
        if let Some(r) = self.record_mut(parent) {
            r.last_child = Some(child);
        }
        self.stats.appended += 1;
    }

    fn replace_child(&mut self, parent: NodeKey, new_child: NodeKey, old_child: NodeKey) {
        if !self.can_insert(parent, new_child, "replace_child") {
            return;
        }
        let Some(old) = self.record(old_child) else {
            debug_assert!(false, "replace_child: node {old_child:?} is not live");
            return;
        };
        if old.parent != Some(parent) {
            debug_assert!(false, "replace_child: {old_child:?} is not a child of {parent:?}");
            log::warn!(target: "dom", "replace_child: {old_child:?} is not a child of {parent:?}; ignored");
            return;
        }
        let prev = old.prev_sibling;
        let next = old.next_sibling;
        if let Some(r) = self.record_mut(new_child) {
            r.parent = Some(parent);
            r.prev_sibling = prev;
            r.next_sibling = next;
        }
        match prev {
            Some(prev) => {
                if let Some(r) = self.record_mut(prev) {
                    r.next_sibling = Some(new_child);
                }
            }
            None => {
                if let Some(r) = self.record_mut(parent) {
                    r.first_child = Some(new_child);
                }
            }
        }
        match next {
            Some(next) => {
                if let Some(r) = self.record_mut(next) {
                    r.prev_sibling = Some(new_child);
                }
            }
            None => {
                if let Some(r) = self.record_mut(parent) {
                    r.last_child = Some(new_child);
                }
            }
        }
        if let Some(r) = self.record_mut(old_child) {
            r.parent = None;
            r.prev_sibling = None;
            r.next_sibling = None;
        }
        self.free_subtree(old_child);
        self.stats.replaced += 1;
    }

    fn remove(&mut self, node: NodeKey) {
        if !self.live_or_warn(node, "remove") {
            return;
        }
        if node == self.root {
            debug_assert!(false, "remove: cannot remove the document root");
            log::warn!(target: "dom", "remove: cannot remove the document root; ignored");
            return;
        }
        self.detach(node);
        self.free_subtree(node);
        self.stats.removed += 1;
    }

    fn attribute(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.element(node)?.attribute(name)
    }

    fn set_attribute(&mut self, node: NodeKey, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            log::warn!(target: "dom", "set_attribute on non-element {node:?}; ignored");
            return;
        };
        el.set_attribute(name, value);
        self.stats.attribute_writes += 1;
    }

    fn remove_attribute(&mut self, node: NodeKey, name: &str) {
        if self.element_mut(node).is_some_and(|el| el.remove_attribute(name)) {
            self.stats.attribute_writes += 1;
        }
    }

    fn property(&self, node: NodeKey, name: &str) -> Option<&PropValue> {
        self.element(node)?.property(name)
    }

    fn set_property(&mut self, node: NodeKey, name: &str, value: PropValue) {
        let Some(el) = self.element_mut(node) else {
            log::warn!(target: "dom", "set_property on non-element {node:?}; ignored");
            return;
        };
        // `className` reflects into the `class` attribute.
        if name == "className" {
            el.set_attribute("class", &value.to_attr_string());
        }
        match el.properties.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some((_, existing)) => *existing = value,
            None => el.properties.push((Arc::from(name), value)),
        }
        self.stats.property_writes += 1;
    }

    fn remove_property(&mut self, node: NodeKey, name: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        let before = el.properties.len();
        el.properties.retain(|(k, _)| k.as_ref() != name);
        if el.properties.len() == before {
            return;
        }
        if name == "className" {
            el.remove_attribute("class");
        }
        self.stats.property_writes += 1;
    }

    fn style_property(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.element(node)?.style.get(name)
    }

    fn set_style_property(&mut self, node: NodeKey, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            log::warn!(target: "dom", "set_style_property on non-element {node:?}; ignored");
            return;
        };
        el.style.set(name, value);
        self.stats.style_writes += 1;
    }

    fn node_name(&self, node: NodeKey) -> &str {
        match self.data(node) {
            Some(NodeData::Element(el)) => el.tag(),
            Some(NodeData::Text(_)) => "#text",
            Some(NodeData::Fragment) => "#document-fragment",
            None => "",
        }
    }

    fn text_value(&self, node: NodeKey) -> Option<&str> {
        match self.data(node)? {
            NodeData::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn first_child(&self, node: NodeKey) -> Option<NodeKey> {
        self.record(node)?.first_child
    }

    fn next_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        self.record(node)?.next_sibling
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.record(node)?.parent
    }

    fn prop_keys(&self, node: NodeKey) -> &[Arc<str>] {
        match self.element(node) {
            Some(el) => el.prop_keys.as_slice(),
            None => &[],
        }
    }

    fn set_prop_keys(&mut self, node: NodeKey, keys: Vec<Arc<str>>) {
        if let Some(el) = self.element_mut(node) {
            el.prop_keys = keys;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, NodeKey};
    use core_types::{EventHandler, HostTree, PropValue};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tags(doc: &Document, parent: NodeKey) -> Vec<String> {
        doc.children(parent)
            .map(|c| doc.node_name(c).to_string())
            .collect()
    }

    #[test]
    fn append_links_siblings_in_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("A");
        let b = doc.create_element("B");
        doc.append_child(root, a);
        doc.append_child(root, b);
        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(b), None);
        assert_eq!(doc.parent(b), Some(root));
        assert_eq!(tags(&doc, root), ["A", "B"]);
    }

    #[test]
    fn replace_keeps_position_and_frees_old_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("A");
        let b = doc.create_element("B");
        let c = doc.create_element("C");
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);
        let inner = doc.create_text("inner");
        doc.append_child(b, inner);

        let x = doc.create_element("X");
        doc.replace_child(root, x, b);

        assert_eq!(tags(&doc, root), ["A", "X", "C"]);
        assert!(!doc.is_live(b));
        assert!(!doc.is_live(inner));
        assert_eq!(doc.stats().replaced, 1);
    }

    #[test]
    fn remove_relinks_neighbours() {
        let mut doc = Document::new();
        let root = doc.root();
        let keys: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|t| {
                let k = doc.create_element(t);
                doc.append_child(root, k);
                k
            })
            .collect();
        doc.remove(keys[2]);
        doc.remove(keys[0]);
        assert_eq!(tags(&doc, root), ["B"]);
        assert_eq!(doc.first_child(root), Some(keys[1]));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn class_name_reflects_to_class_attribute() {
        let mut doc = Document::new();
        let el = doc.create_element("DIV");
        doc.set_property(el, "className", PropValue::from("card"));
        assert_eq!(doc.attribute(el, "class"), Some("card"));
        doc.remove_property(el, "className");
        assert_eq!(doc.attribute(el, "class"), None);
    }

    #[test]
    fn dispatch_calls_handler_property() {
        let mut doc = Document::new();
        let el = doc.create_element("BUTTON");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let handler = EventHandler::new(move |event| {
            assert_eq!(event, "click");
            counter.fetch_add(1, Ordering::SeqCst);
        });
        doc.set_property(el, "onclick", PropValue::Handler(handler));
        assert!(doc.dispatch(el, "click"));
        assert!(!doc.dispatch(el, "input"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn node_names_follow_dom_conventions() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        let el = doc.create_element("MY-BUTTON");
        assert_eq!(doc.node_name(doc.root()), "#document-fragment");
        assert_eq!(doc.node_name(text), "#text");
        assert_eq!(doc.node_name(el), "MY-BUTTON");
        assert_eq!(doc.text_value(text), Some("hi"));
        assert_eq!(doc.text_value(el), None);
    }

    #[test]
    fn churned_keys_stay_dead() {
        let mut doc = Document::new();
        let root = doc.root();
        let mut current = doc.create_text("0");
        doc.append_child(root, current);
        let mut retired = Vec::new();
        for i in 1..4 {
            let next = doc.create_text(&i.to_string());
            doc.replace_child(root, next, current);
            retired.push(current);
            current = next;
        }
        assert_eq!(doc.len(), 2);
        assert!(retired.iter().all(|key| !doc.is_live(*key)));
        assert!(retired.iter().all(|key| *key != current));
        assert_eq!(doc.text_value(current), Some("3"));
    }
}
