//! Shared vocabulary between the reconciler and the host trees it drives.
//!
//! This crate intentionally has no dependencies: hosts implement
//! [`HostTree`] and [`TypeRegistry`] without pulling in the reconciler.

mod host;
mod registry;
mod value;

pub use host::HostTree;
pub use registry::{CustomElement, ElementType, TypeBase, TypeRegistry};
pub use value::{EventHandler, PropValue, StyleMap};
