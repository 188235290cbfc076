//! Namespace introspection through the nsfs ioctls
//!
//! Every query takes a borrowed namespace fd and leaves kernel and process
//! state alone, so they can be called from any thread. Descriptors returned by
//! the kernel are handed over as [`OwnedFd`] and have `O_CLOEXEC` set.

use std::os::fd::{AsFd, AsRawFd, FromRawFd, OwnedFd};

use libc::c_int;
use lxns_core::{NamespaceKind, Result, SyscallResultExt};

mod ioctl {
    use lxns_core::consts::{
        NS_GET_NSTYPE_NR, NS_GET_OWNER_UID_NR, NS_GET_PARENT_NR, NS_GET_USERNS_NR, NSIO,
    };

    nix::ioctl_none!(
        /// `NS_GET_USERNS`
        ns_get_userns,
        NSIO,
        NS_GET_USERNS_NR
    );
    nix::ioctl_none!(
        /// `NS_GET_PARENT`
        ns_get_parent,
        NSIO,
        NS_GET_PARENT_NR
    );
    nix::ioctl_none!(
        /// `NS_GET_NSTYPE`
        ns_get_nstype,
        NSIO,
        NS_GET_NSTYPE_NR
    );
    // Encoded as _IO although the kernel writes a uid_t through the argument
    nix::ioctl_read_bad!(
        /// `NS_GET_OWNER_UID`
        ns_get_owner_uid,
        nix::request_code_none!(NSIO, NS_GET_OWNER_UID_NR),
        libc::uid_t
    );
}

/// Open the user namespace owning the namespace referenced by `fd`
///
/// # Errors
/// `ENOTTY` if `fd` is not a namespace, `EPERM` if the owner lies outside the
/// caller's user namespace.
pub fn ns_get_userns<Fd: AsFd>(fd: Fd) -> Result<OwnedFd> {
    let fd = fd.as_fd().as_raw_fd();
    // SAFETY: NS_GET_USERNS takes no argument.
    let raw = unsafe { ioctl::ns_get_userns(fd) }.with_op("ns_get_userns")?;

    tracing::trace!(fd, userns = raw, "opened owning user namespace");
    // SAFETY: on success the kernel installed a new descriptor for us.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

/// Open the parent of a PID or user namespace
///
/// # Errors
/// `EINVAL` for namespace kinds without a hierarchy, `EPERM` if the parent
/// lies outside the caller's namespace, `ENOTTY` if `fd` is not a namespace.
pub fn ns_get_parent<Fd: AsFd>(fd: Fd) -> Result<OwnedFd> {
    let fd = fd.as_fd().as_raw_fd();
    // SAFETY: NS_GET_PARENT takes no argument.
    let raw = unsafe { ioctl::ns_get_parent(fd) }.with_op("ns_get_parent")?;

    tracing::trace!(fd, parent = raw, "opened parent namespace");
    // SAFETY: on success the kernel installed a new descriptor for us.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

/// Raw kind constant (`CLONE_NEW*`) of the namespace referenced by `fd`
///
/// # Errors
/// `ENOTTY` if `fd` is not a namespace.
pub fn ns_get_nstype_raw<Fd: AsFd>(fd: Fd) -> Result<c_int> {
    // SAFETY: NS_GET_NSTYPE takes no argument.
    unsafe { ioctl::ns_get_nstype(fd.as_fd().as_raw_fd()) }.with_op("ns_get_nstype")
}

/// Kind of the namespace referenced by `fd`
///
/// # Errors
/// `ENOTTY` if `fd` is not a namespace, [`lxns_core::Error::UnknownNamespaceKind`]
/// if the kernel reports a kind this crate does not know about.
pub fn ns_get_nstype<Fd: AsFd>(fd: Fd) -> Result<NamespaceKind> {
    NamespaceKind::try_from(ns_get_nstype_raw(fd)?)
}

/// UID of the creator of the user namespace referenced by `fd`
///
/// The kernel only answers for user namespaces; use
/// [`crate::Namespace::owner_uid`] to resolve other kinds through their owning
/// user namespace. A UID without mapping in the caller's user namespace reads
/// back as the overflow UID.
///
/// # Errors
/// `EINVAL` if `fd` is a namespace of another kind, `ENOTTY` if `fd` is not a
/// namespace.
pub fn ns_get_owner_uid<Fd: AsFd>(fd: Fd) -> Result<u32> {
    let mut uid: libc::uid_t = libc::uid_t::MAX;
    // SAFETY: the kernel writes exactly one uid_t through the pointer.
    unsafe { ioctl::ns_get_owner_uid(fd.as_fd().as_raw_fd(), &raw mut uid) }
        .with_op("ns_get_owner_uid")?;
    Ok(uid)
}

/// Namespace identifier: the inode number of its nsfs file
///
/// Two descriptors reference the same namespace exactly when their ids are
/// equal. This is the number shown in `/proc/<pid>/ns/*` links.
///
/// # Errors
/// `EBADF` for a closed fd.
#[allow(clippy::useless_conversion)]
pub fn ns_id<Fd: AsFd>(fd: Fd) -> Result<u64> {
    nix::sys::stat::fstat(fd)
        .with_op("fstat")
        .map(|st| u64::from(st.st_ino))
}
