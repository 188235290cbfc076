//! Detached mount trees through the new mount API
//!
//! - [`open_tree`] - pick up (or clone) a mount subtree as an fd
//! - [`move_mount`] - attach such an fd somewhere, or move an existing mount
//! - [`ClonedTree`] - a cloned subtree waiting to be mounted
//!
//! Cloned subtrees are not tied to a mount namespace until attached. This is
//! what allows bind-mounting a path from one mount namespace into another.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod cloned;
pub mod probe;
pub mod tree;

pub use cloned::ClonedTree;
pub use lxns_core::{DirFd, Error, MoveMountFlags, OpenTreeFlags, Result};
pub use probe::mount_api_supported;
pub use tree::{move_mount, open_tree};
