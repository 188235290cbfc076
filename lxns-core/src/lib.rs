//! lxns core - kernel constants, typed flags and errors
//!
//! This crate provides the pieces shared by every lxns facade crate: the
//! constant table, one flag type per syscall and the error type.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod consts;
pub mod error;
pub mod flags;
pub mod types;

pub use error::{Error, Result, SyscallResultExt, check};
pub use flags::{AtFlags, CloneFlags, MoveMountFlags, OpenTreeFlags};
pub use types::{DirFd, NamespaceKind, ProcessId};
