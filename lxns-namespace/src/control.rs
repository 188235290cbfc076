//! Namespace control: `unshare(2)` and `setns(2)`
//!
//! Both calls change the namespace membership of the calling thread (and, for
//! some kinds, of the whole process). The change is visible to every child
//! spawned afterwards. Entering or creating a user namespace requires a
//! single-threaded process; callers running in a multithreaded process have to
//! coordinate that themselves.

use std::os::fd::{AsFd, AsRawFd};

use libc::c_int;
use lxns_core::{CloneFlags, NamespaceKind, Result, SyscallResultExt};

use crate::config::NamespaceConfig;

/// Move the calling thread into new namespaces of the kinds selected by `flags`
///
/// `CloneFlags::empty()` is accepted and changes nothing. `NEWPID` and
/// `NEWTIME` only take effect for children created afterwards.
///
/// # Errors
/// The kernel errno, verbatim: `EINVAL` for unknown bits or `NEWUSER` from a
/// multithreaded process, `EPERM` without the needed capability, `ENOSPC` or
/// `EUSERS` when a namespace limit is reached.
pub fn unshare(flags: CloneFlags) -> Result<()> {
    nix::sched::unshare(flags.into())
        .with_op("unshare")
        .inspect_err(|e| tracing::warn!(?flags, error = %e, "unshare failed"))?;

    tracing::debug!(?flags, "unshared namespaces");
    Ok(())
}

/// Unshare every namespace kind enabled in `config`
///
/// # Errors
/// See [`unshare`].
pub fn unshare_namespaces(config: &NamespaceConfig) -> Result<()> {
    unshare(config.to_clone_flags())
}

/// Join the namespace referenced by `fd`
///
/// With `Some(kind)` the kernel first checks that `fd` refers to a namespace
/// of that kind. `None` accepts any kind.
///
/// # Errors
/// The kernel errno, verbatim: `EBADF` for a closed fd, `EINVAL` for an fd
/// that is not a namespace or of the wrong kind, `EPERM` without privilege.
pub fn setns<Fd: AsFd>(fd: Fd, nstype: Option<NamespaceKind>) -> Result<()> {
    let flags = nstype.map_or(CloneFlags::empty(), NamespaceKind::clone_flag);
    setns_raw(fd, flags.bits())
}

/// Join the namespace referenced by `fd`, with a raw `nstype` constant
///
/// # Errors
/// See [`setns`].
pub fn setns_raw<Fd: AsFd>(fd: Fd, nstype: c_int) -> Result<()> {
    let fd = fd.as_fd();

    nix::sched::setns(fd, nix::sched::CloneFlags::from_bits_retain(nstype))
        .with_op("setns")
        .inspect_err(|e| {
            tracing::warn!(fd = fd.as_raw_fd(), nstype, error = %e, "setns failed");
        })?;

    tracing::debug!(fd = fd.as_raw_fd(), nstype, "joined namespace");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn test_unshare_nothing() {
        assert!(unshare(CloneFlags::empty()).is_ok());
    }

    #[test]
    fn test_unshare_invalid_flags() {
        let err = unshare(CloneFlags::from_bits_retain(-1)).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EINVAL));
    }

    #[test]
    fn test_setns_on_regular_file() {
        let file = std::fs::File::open("/proc/self/status").unwrap();

        let err = setns(&file, None).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EINVAL));
    }

    #[test]
    fn test_setns_on_closed_fd() {
        // SAFETY: the number is far above any descriptor this process opens.
        let fd = unsafe { std::os::fd::BorrowedFd::borrow_raw(999_999) };

        let err = setns(fd, None).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EBADF));
    }
}
