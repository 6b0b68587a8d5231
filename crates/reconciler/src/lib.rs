//! Incremental reconciler: turns a stream of declared build operations
//! (open element, text, close, finish) into the minimal mutations that make a
//! host tree's children match the declaration.
//!
//! Diffing is positional. Every operation looks at one candidate node, the
//! sibling after the last reconciled child of the open scope, so a pass is a
//! single walk over the declared nodes and the scopes they touch. There are no
//! keys: moving a child to another position replaces every mismatched node in
//! between instead of moving it, and the replaced subtrees are rebuilt.
//!
//! ```ignore
//! let registry = Arc::new(CustomElementRegistry::new());
//! let root = doc.root();
//! Renderer::new(&mut doc, root, registry)
//!     .open("div", Props::new().class_name("card"))
//!     .el("span")
//!     .text("Hello")
//!     .close("span")
//!     .close("div")
//!     .finish()?;
//! ```

mod builder;
mod config;
mod cursor;
mod error;
mod ops;
mod props;
mod scheduler;
mod tag;

pub use builder::Renderer;
pub use config::ReconcilerConfig;
pub use cursor::Cursor;
pub use error::{NamingError, NamingFailure, ReconcileError, ScopeMismatchError};
pub use ops::Reconciler;
pub use props::{Props, apply_props};
pub use scheduler::{Operation, SchedulerState, Task, TaskQueue};
pub use tag::{Tag, TagName, TagResolver, derive_custom_tag, tag_identity};

pub use core_types::{
    CustomElement, ElementType, EventHandler, HostTree, PropValue, StyleMap, TypeBase,
    TypeRegistry,
};
