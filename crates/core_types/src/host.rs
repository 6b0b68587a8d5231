//! Host tree capabilities required by the reconciler.
//!
//! Invariants the reconciler relies on:
//! - Handles returned by `create_*` stay valid until the node (or an ancestor)
//!   is removed or replaced.
//! - `first_child`, `next_sibling` and `parent` reflect every mutation made
//!   through this trait immediately.
//! - Only one writer mutates a given subtree; concurrent external mutation of a
//!   subtree a reconciler owns is unsupported.

use crate::value::PropValue;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

pub trait HostTree {
    /// Opaque handle into the host tree. The reconciler never owns nodes.
    type Node: Copy + Eq + Hash + Debug;

    /// Create a detached element with a canonical (uppercase) tag identifier.
    fn create_element(&mut self, tag: &str) -> Self::Node;
    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);
    /// Put `new_child` at the position of `old_child` and discard `old_child`
    /// together with its subtree.
    fn replace_child(&mut self, parent: Self::Node, new_child: Self::Node, old_child: Self::Node);
    /// Detach and discard `node` and its subtree.
    fn remove(&mut self, node: Self::Node);

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    fn property(&self, node: Self::Node, name: &str) -> Option<&PropValue>;
    fn set_property(&mut self, node: Self::Node, name: &str, value: PropValue);
    fn remove_property(&mut self, node: Self::Node, name: &str);

    fn style_property(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn set_style_property(&mut self, node: Self::Node, name: &str, value: &str);

    /// DOM `nodeName`: uppercase tag for elements, `#text` for text nodes,
    /// `#document-fragment` for fragments.
    fn node_name(&self, node: Self::Node) -> &str;
    /// `Some` only for text nodes.
    fn text_value(&self, node: Self::Node) -> Option<&str>;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Keys applied to `node` by the previous reconciliation pass.
    fn prop_keys(&self, node: Self::Node) -> &[Arc<str>];
    fn set_prop_keys(&mut self, node: Self::Node, keys: Vec<Arc<str>>);
}

impl<T: HostTree + ?Sized> HostTree for &mut T {
    type Node = T::Node;

    fn create_element(&mut self, tag: &str) -> Self::Node {
        (**self).create_element(tag)
    }

    fn create_text(&mut self, text: &str) -> Self::Node {
        (**self).create_text(text)
    }

    fn append_child(&mut self, parent: Self::Node, child: Self::Node) {
        (**self).append_child(parent, child)
    }

    fn replace_child(&mut self, parent: Self::Node, new_child: Self::Node, old_child: Self::Node) {
        (**self).replace_child(parent, new_child, old_child)
    }

    fn remove(&mut self, node: Self::Node) {
        (**self).remove(node)
    }

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str> {
        (**self).attribute(node, name)
    }

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str) {
        (**self).set_attribute(node, name, value)
    }

    fn remove_attribute(&mut self, node: Self::Node, name: &str) {
        (**self).remove_attribute(node, name)
    }

    fn property(&self, node: Self::Node, name: &str) -> Option<&PropValue> {
        (**self).property(node, name)
    }

    fn set_property(&mut self, node: Self::Node, name: &str, value: PropValue) {
        (**self).set_property(node, name, value)
    }

    fn remove_property(&mut self, node: Self::Node, name: &str) {
        (**self).remove_property(node, name)
    }

    fn style_property(&self, node: Self::Node, name: &str) -> Option<&str> {
        (**self).style_property(node, name)
    }

    fn set_style_property(&mut self, node: Self::Node, name: &str, value: &str) {
        (**self).set_style_property(node, name, value)
    }

    fn node_name(&self, node: Self::Node) -> &str {
        (**self).node_name(node)
    }

    fn text_value(&self, node: Self::Node) -> Option<&str> {
        (**self).text_value(node)
    }

    fn first_child(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).first_child(node)
    }

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).next_sibling(node)
    }

    fn parent(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).parent(node)
    }

    fn prop_keys(&self, node: Self::Node) -> &[Arc<str>] {
        (**self).prop_keys(node)
    }

    fn set_prop_keys(&mut self, node: Self::Node, keys: Vec<Arc<str>>) {
        (**self).set_prop_keys(node, keys)
    }
}
