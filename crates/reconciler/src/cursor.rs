use crate::error::ReconcileError;
use core_types::HostTree;

/// Position of the reconciler in the host tree: the open container scope and
/// the last child reconciled in it.
///
/// Invariant: `last`, when set, is a current child of `container`. The next
/// candidate for any operation is `last.next_sibling`, or the container's first
/// child when nothing has been reconciled in it yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor<N> {
    root: N,
    container: N,
    last: Option<N>,
}

impl<N: Copy + Eq> Cursor<N> {
    pub fn new(root: N) -> Self {
        Self {
            root,
            container: root,
            last: None,
        }
    }

    pub fn root(&self) -> N {
        self.root
    }

    pub fn container(&self) -> N {
        self.container
    }

    pub fn last_reconciled(&self) -> Option<N> {
        self.last
    }

    pub fn is_at_root(&self) -> bool {
        self.container == self.root
    }

    /// Current candidate node; does not move the cursor.
    pub fn next<H: HostTree<Node = N>>(&self, host: &H) -> Option<N> {
        match self.last {
            Some(last) => host.next_sibling(last),
            None => host.first_child(self.container),
        }
    }

    pub fn advance(&mut self, node: N) {
        self.last = Some(node);
    }

    /// Descend into `node`; following operations target its children.
    pub fn open_scope(&mut self, node: N) {
        self.container = node;
        self.last = None;
    }

    /// Ascend: the closed container becomes the last reconciled child of its
    /// parent. Closing the render root is an error.
    pub fn close_scope<H: HostTree<Node = N>>(&mut self, host: &H) -> Result<(), ReconcileError> {
        let parent = if self.is_at_root() {
            None
        } else {
            host.parent(self.container)
        };
        let Some(parent) = parent else {
            return Err(ReconcileError::UnbalancedClose {
                root: host.node_name(self.root).to_string(),
            });
        };
        self.last = Some(self.container);
        self.container = parent;
        Ok(())
    }
}
