//! In-memory host tree for the reconciler.
//!
//! [`Document`] is an arena of nodes with DOM-like sibling links and
//! implements [`core_types::HostTree`]. [`CustomElementRegistry`] is the
//! process-wide custom element registry shared by every reconciler instance.

mod document;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
mod registry;

pub use crate::document::{Children, Document, ElementData, MutationStats, NodeData, NodeKey};
pub use crate::registry::CustomElementRegistry;
