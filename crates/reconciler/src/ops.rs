//! The four reconciliation operations.
//!
//! Each operation compares the declared node against the candidate under the
//! cursor (the sibling after the last reconciled child, or the container's
//! first child) and reuses it when it matches, otherwise creates a new node
//! that replaces the candidate or, when there is none, is appended.

use crate::config::ReconcilerConfig;
use crate::cursor::Cursor;
use crate::error::{ReconcileError, ScopeMismatchError};
use crate::props::{Props, apply_props};
use crate::scheduler::Operation;
use crate::tag::{Tag, TagResolver};
use core_types::{HostTree, TypeRegistry};
use std::sync::Arc;

/// Reconciliation state for one pass over the children of a render root.
pub struct Reconciler<H: HostTree> {
    host: H,
    cursor: Cursor<H::Node>,
    resolver: TagResolver,
    config: ReconcilerConfig,
}

impl<H: HostTree> Reconciler<H> {
    pub fn new(host: H, root: H::Node, registry: Arc<dyn TypeRegistry>) -> Self {
        Self::with_config(host, root, registry, ReconcilerConfig::default())
    }

    pub fn with_config(
        host: H,
        root: H::Node,
        registry: Arc<dyn TypeRegistry>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            host,
            cursor: Cursor::new(root),
            resolver: TagResolver::new(registry),
            config,
        }
    }

    pub fn cursor(&self) -> &Cursor<H::Node> {
        &self.cursor
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn execute(&mut self, op: &Operation) -> Result<(), ReconcileError> {
        match op {
            Operation::Open { tag, props } => self.element(tag, props),
            Operation::Text(value) => {
                self.text(value);
                Ok(())
            }
            Operation::Close(tag) => self.close(tag.as_ref()),
            Operation::Finish => self.finish(),
        }
    }

    /// Reconcile an element at the cursor and, unless it is void, open its
    /// scope.
    pub fn element(&mut self, tag: &Tag, props: &Props) -> Result<(), ReconcileError> {
        let name = self.resolver.resolve(tag)?;
        let candidate = self.cursor.next(&self.host);
        let node = match candidate {
            Some(existing) if self.host.node_name(existing) == name.as_str() => existing,
            _ => {
                let created = self.host.create_element(name.as_str());
                self.place(candidate, created);
                created
            }
        };
        apply_props(&mut self.host, node, props);
        self.cursor.advance(node);
        if !name.is_void() {
            self.cursor.open_scope(node);
        }
        Ok(())
    }

    /// Reconcile a text node at the cursor.
    pub fn text(&mut self, value: &str) {
        let candidate = self.cursor.next(&self.host);
        let node = match candidate {
            Some(existing) if self.host.text_value(existing) == Some(value) => existing,
            _ => {
                let created = self.host.create_text(value);
                self.place(candidate, created);
                created
            }
        };
        self.cursor.advance(node);
    }

    /// Close the open scope: prune its unreconciled trailing children and
    /// make it the last reconciled child of its parent.
    pub fn close(&mut self, expected: Option<&Tag>) -> Result<(), ReconcileError> {
        if let Some(tag) = expected {
            let name = self.resolver.resolve(tag)?;
            let actual = self.host.node_name(self.cursor.container());
            if actual != name.as_str() {
                return Err(ScopeMismatchError {
                    expected: name.to_string(),
                    actual: actual.to_string(),
                    root: self.host.node_name(self.cursor.root()).to_string(),
                }
                .into());
            }
        }
        if self.cursor.is_at_root() {
            return Err(ReconcileError::UnbalancedClose {
                root: self.host.node_name(self.cursor.root()).to_string(),
            });
        }
        self.prune();
        self.cursor.close_scope(&self.host)
    }

    /// Close every open scope. Trailing root children are only dropped when
    /// `prune_root_on_finish` is set.
    pub fn finish(&mut self) -> Result<(), ReconcileError> {
        while !self.cursor.is_at_root() {
            self.close(None)?;
        }
        if self.config.prune_root_on_finish {
            self.prune();
        }
        Ok(())
    }

    fn place(&mut self, candidate: Option<H::Node>, node: H::Node) {
        let container = self.cursor.container();
        match candidate {
            Some(old) => {
                log::debug!(
                    target: "reconciler.ops",
                    "replace {old:?} <{}> with {node:?} <{}>",
                    self.host.node_name(old),
                    self.host.node_name(node)
                );
                self.host.replace_child(container, node, old);
            }
            None => {
                log::debug!(
                    target: "reconciler.ops",
                    "append {node:?} <{}> to {container:?}",
                    self.host.node_name(node)
                );
                self.host.append_child(container, node);
            }
        }
    }

    /// Remove every child of the container after the last reconciled one.
    fn prune(&mut self) {
        let mut stale = self.cursor.next(&self.host);
        let mut removed = 0usize;
        while let Some(node) = stale {
            stale = self.host.next_sibling(node);
            self.host.remove(node);
            removed += 1;
        }
        if removed > 0 {
            log::debug!(
                target: "reconciler.ops",
                "pruned {removed} stale child(ren) of {:?}",
                self.cursor.container()
            );
        }
    }
}
