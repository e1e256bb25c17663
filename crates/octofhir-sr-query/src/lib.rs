//! Navigation over DICOM SR content trees
//!
//! - [`Walk`]: restartable pre-order or breadth-first traversal, bounded by depth
//! - [`SrPath`]: `/Findings/Finding[1]` style addresses, parsed with winnow
//! - [`Navigator`]: path resolution, searches and measurement lookup
//!
//! Everything here borrows the tree; nothing mutates it.

mod error;
mod navigator;
mod path;
mod walk;

pub use error::PathError;
pub use navigator::{Measurement, Navigator};
pub use path::{Filter, PathComponent, SrPath};
pub use walk::{Visit, Walk, WalkIter, WalkOptions, WalkOrder};
