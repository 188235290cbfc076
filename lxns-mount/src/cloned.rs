//! Cloned mount subtrees

use std::fmt;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use lxns_core::{DirFd, MoveMountFlags, OpenTreeFlags, Result};
use nix::NixPath;

use crate::tree::{move_mount, open_tree};

/// A detached copy of a mount subtree
///
/// Created with `OPEN_TREE_CLONE`, so it belongs to no mount namespace until
/// [`ClonedTree::mount`] attaches it. A tree that is never attached is
/// unmounted when dropped. Attaching it in a different mount namespace than
/// the one it was cloned from is how a bind mount crosses namespaces.
#[derive(Debug)]
pub struct ClonedTree {
    fd: OwnedFd,
}

impl ClonedTree {
    /// Clone the mount at `path` (submounts are left out)
    ///
    /// # Errors
    /// See [`open_tree`]; `EPERM` without `CAP_SYS_ADMIN` in the owning user
    /// namespace of the current mount namespace.
    pub fn new<P: ?Sized + NixPath>(path: &P) -> Result<Self> {
        Self::with_flags(DirFd::Cwd, path, OpenTreeFlags::empty())
    }

    /// Clone the mount at `path` together with all its submounts
    ///
    /// # Errors
    /// See [`ClonedTree::new`].
    pub fn recursive<P: ?Sized + NixPath>(path: &P) -> Result<Self> {
        Self::with_flags(DirFd::Cwd, path, OpenTreeFlags::RECURSIVE)
    }

    /// Clone with additional path resolution flags
    ///
    /// `OPEN_TREE_CLONE` and `OPEN_TREE_CLOEXEC` are always added.
    ///
    /// # Errors
    /// See [`open_tree`].
    pub fn with_flags<P: ?Sized + NixPath>(
        dirfd: DirFd<'_>,
        path: &P,
        flags: OpenTreeFlags,
    ) -> Result<Self> {
        let flags = flags | OpenTreeFlags::CLONE | OpenTreeFlags::CLOEXEC;
        let fd = open_tree(dirfd, Some(path), flags)?;
        Ok(Self { fd })
    }

    /// Attach the tree at `to`, relative to the current directory
    ///
    /// # Errors
    /// See [`move_mount`].
    pub fn mount<P: ?Sized + NixPath>(&self, to: &P) -> Result<()> {
        self.mount_at(DirFd::Cwd, to)
    }

    /// Attach the tree at `to`, relative to `dirfd`
    ///
    /// # Errors
    /// See [`move_mount`].
    pub fn mount_at<P: ?Sized + NixPath>(&self, dirfd: DirFd<'_>, to: &P) -> Result<()> {
        move_mount(
            DirFd::from_fd(&self.fd),
            "",
            dirfd,
            to,
            MoveMountFlags::F_EMPTY_PATH,
        )
    }
}

impl AsFd for ClonedTree {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for ClonedTree {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl From<ClonedTree> for OwnedFd {
    fn from(tree: ClonedTree) -> Self {
        tree.fd
    }
}

impl fmt::Display for ClonedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<cloned tree fd={}>", self.fd.as_raw_fd())
    }
}
