//! Chainable builder front end.
//!
//! Every call becomes a task on the renderer's queue; the outermost call
//! drains the queue, so a call made from inside a running operation (a host
//! hook, say) only appends and runs after the current one. The first failing
//! operation halts the renderer; later calls are recorded but never run, and
//! [`Renderer::finish`] / [`Renderer::error`] report the failure.

use crate::config::ReconcilerConfig;
use crate::error::ReconcileError;
use crate::ops::Reconciler;
use crate::props::Props;
use crate::scheduler::{Operation, Task, TaskQueue};
use crate::tag::Tag;
use core_types::{HostTree, TypeRegistry};
use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;
use std::sync::Arc;

struct Shared<H: HostTree> {
    root: H::Node,
    queue: TaskQueue,
    reconciler: RefCell<Reconciler<H>>,
}

/// Declares the children of one render root.
///
/// Cloning yields another handle to the same pass. The renderer owns its
/// host; pass `&mut doc` to keep ownership of the document outside.
pub struct Renderer<H: HostTree> {
    shared: Rc<Shared<H>>,
}

impl<H: HostTree> Clone for Renderer<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: HostTree> fmt::Debug for Renderer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("root", &self.shared.root)
            .field("state", &self.shared.queue.state())
            .field("pending", &self.shared.queue.len())
            .finish()
    }
}

impl<H: HostTree> Renderer<H> {
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
            shared: Rc::new(Shared {
                root,
                queue: TaskQueue::new(),
                reconciler: RefCell::new(Reconciler::with_config(host, root, registry, config)),
            }),
        }
    }

    /// Open an element with declared properties.
    pub fn open(&self, tag: impl Into<Tag>, props: Props) -> &Self {
        self.submit(Operation::Open {
            tag: tag.into(),
            props,
        })
    }

    /// Open an element without properties.
    pub fn el(&self, tag: impl Into<Tag>) -> &Self {
        self.open(tag, Props::new())
    }

    pub fn text(&self, value: impl Display) -> &Self {
        self.submit(Operation::Text(value.to_string()))
    }

    /// Close the open scope, which must be `tag`.
    pub fn close(&self, tag: impl Into<Tag>) -> &Self {
        self.submit(Operation::Close(Some(tag.into())))
    }

    /// Close the open scope whatever its tag.
    pub fn end(&self) -> &Self {
        self.submit(Operation::Close(None))
    }

    /// Close every open scope and end the pass. Returns the first error of
    /// the pass, if any.
    ///
    /// Called from inside a running operation (a host hook), the finish task
    /// is only queued: the result covers the operations run so far, and
    /// [`Renderer::pending`] stays non-zero until the outer call has drained
    /// the queue. Check [`Renderer::error`] afterwards for the final outcome.
    pub fn finish(&self) -> Result<(), ReconcileError> {
        self.submit(Operation::Finish);
        match self.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run `f` with this renderer and the render root, for factoring
    /// declarations into functions without breaking the chain.
    pub fn bind<F>(&self, f: F) -> &Self
    where
        F: FnOnce(&Self, H::Node),
    {
        f(self, self.shared.root);
        self
    }

    /// Access the host between operations. Returns `None` while an operation
    /// is executing (i.e. when called from inside a host hook).
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> Option<R> {
        let mut reconciler = self.shared.reconciler.try_borrow_mut().ok()?;
        Some(f(reconciler.host_mut()))
    }

    pub fn error(&self) -> Option<ReconcileError> {
        self.shared.queue.error()
    }

    /// Operations submitted but not completed.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn root(&self) -> H::Node {
        self.shared.root
    }

    /// Give the host back. Fails, returning the handle, while other clones
    /// of this renderer are alive.
    pub fn into_host(self) -> Result<H, Self> {
        match Rc::try_unwrap(self.shared) {
            Ok(shared) => Ok(shared.reconciler.into_inner().into_host()),
            Err(shared) => Err(Self { shared }),
        }
    }

    fn submit(&self, op: Operation) -> &Self {
        let queue = &self.shared.queue;
        if queue.enqueue(Task::new(op)) {
            let result = queue.drain(|op| self.shared.reconciler.borrow_mut().execute(op));
            if let Err(err) = result {
                log::debug!(target: "reconciler.ops", "render pass at {:?} failed: {err}", self.shared.root);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::error::ReconcileError;
    use core_types::HostTree;
    use dom::dom_snapshot::{DomSnapshot, assert_snapshot_eq};
    use dom::{CustomElementRegistry, Document};
    use std::sync::Arc;

    #[test]
    fn chained_calls_build_the_tree() {
        let mut doc = Document::new();
        let root = doc.root();
        Renderer::new(&mut doc, root, Arc::new(CustomElementRegistry::new()))
            .el("div")
            .el("span")
            .text(42)
            .close("span")
            .end()
            .finish()
            .unwrap();

        assert_snapshot_eq(
            &["#document-fragment", "  <DIV>", "    <SPAN>", "      \"42\""],
            &DomSnapshot::of(&doc),
        );
    }

    #[test]
    fn bind_passes_the_root() {
        let mut doc = Document::new();
        let root = doc.root();
        let renderer = Renderer::new(&mut doc, root, Arc::new(CustomElementRegistry::new()));
        renderer
            .el("ul")
            .bind(|r, bound_root| {
                assert_eq!(bound_root, root);
                for item in ["a", "b"] {
                    r.el("li").text(item).end();
                }
            })
            .end();
        assert_eq!(renderer.finish(), Ok(()));
        let lines = renderer.with_host(|doc| DomSnapshot::of(doc).render());
        assert_eq!(
            lines.as_deref(),
            Some("#document-fragment\n  <UL>\n    <LI>\n      \"a\"\n    <LI>\n      \"b\"")
        );
    }

    #[test]
    fn errors_halt_the_renderer() {
        let renderer = Renderer::new(
            Document::new(),
            dom::NodeKey(1),
            Arc::new(CustomElementRegistry::new()),
        );
        renderer.end().text("never");
        assert!(matches!(
            renderer.error(),
            Some(ReconcileError::UnbalancedClose { .. })
        ));
        assert_eq!(renderer.pending(), 2);
        assert!(renderer.finish().is_err());
        assert_eq!(renderer.pending(), 3);

        let doc = renderer.into_host().unwrap();
        assert_eq!(doc.first_child(doc.root()), None);
    }

    #[test]
    fn into_host_fails_while_clones_are_alive() {
        let renderer = Renderer::new(
            Document::new(),
            dom::NodeKey(1),
            Arc::new(CustomElementRegistry::new()),
        );
        let other = renderer.clone();
        let renderer = renderer.into_host().unwrap_err();
        drop(other);
        assert!(renderer.into_host().is_ok());
    }
}
