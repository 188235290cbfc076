//! Linux namespace control and introspection
//!
//! This crate wraps the kernel interfaces that move processes between
//! namespaces and query their relationships:
//! - `unshare(2)` and `setns(2)` - create or join namespaces
//! - nsfs ioctls - owning user namespace, parent, kind and owner UID
//! - [`Namespace`] - an owned namespace fd that knows its kind
//! - [`NamespaceManager`] - per-process snapshots and joining every namespace
//!   of another process

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod control;
pub mod introspect;
pub mod manager;
pub mod namespace;

pub use config::NamespaceConfig;
pub use control::{setns, setns_raw, unshare, unshare_namespaces};
pub use introspect::{
    ns_get_nstype, ns_get_nstype_raw, ns_get_owner_uid, ns_get_parent, ns_get_userns, ns_id,
};
pub use lxns_core::{CloneFlags, Error, NamespaceKind, ProcessId, Result};
pub use manager::{NamespaceEntry, NamespaceInfo, NamespaceManager};
pub use namespace::{Namespace, NamespaceKindExt};
