//! `open_tree(2)` and `move_mount(2)`
//!
//! libc has no wrappers for either call, so both go through `syscall(2)`.
//! Paths accept anything implementing [`NixPath`]; a path containing a NUL
//! byte fails with `EINVAL` before the kernel is reached.

use std::os::fd::OwnedFd;

use lxns_core::{DirFd, MoveMountFlags, OpenTreeFlags, Result};
use nix::NixPath;

#[cfg(target_os = "linux")]
use crate::probe;
#[cfg(not(target_os = "linux"))]
use lxns_core::Error;

/// Open the mount subtree at `path`, relative to `dirfd`
///
/// With `path = None` the kernel receives a NULL pointer; combine this with
/// `OpenTreeFlags::EMPTY_PATH` to refer to `dirfd` itself on kernels that
/// accept it. Without `OpenTreeFlags::CLONE` the result is an `O_PATH`-like
/// fd on the existing mount; with it, a detached copy of the subtree that is
/// unmounted again when the fd is closed.
///
/// # Errors
/// [`lxns_core::Error::Unsupported`] without kernel support, otherwise the
/// kernel errno: `ENOENT` for a missing path, `EPERM` for `CLONE` without
/// `CAP_SYS_ADMIN`, `EINVAL` for unknown flags.
#[cfg(target_os = "linux")]
pub fn open_tree<P: ?Sized + NixPath>(
    dirfd: DirFd<'_>,
    path: Option<&P>,
    flags: OpenTreeFlags,
) -> Result<OwnedFd> {
    use std::os::fd::{FromRawFd, RawFd};

    use lxns_core::{SyscallResultExt, check};
    use nix::errno::Errno;

    probe::ensure_supported("open_tree")?;

    let call = |path: *const libc::c_char| {
        // SAFETY: `path` is NULL or a NUL-terminated string that outlives the
        // call; the kernel only reads it.
        unsafe { libc::syscall(libc::SYS_open_tree, dirfd.as_raw_fd(), path, flags.bits()) }
    };
    let ret = match path {
        Some(path) => path.with_nix_path(|path| call(path.as_ptr())),
        None => Ok(call(std::ptr::null())),
    }
    .with_op("open_tree")?;

    let raw = check("open_tree", ret)
        .inspect_err(|e| tracing::warn!(?flags, error = %e, "open_tree failed"))?;
    let raw = RawFd::try_from(raw).map_err(|_| lxns_core::Error::os("open_tree", Errno::EBADF))?;

    tracing::debug!(fd = raw, ?flags, "opened mount tree");
    // SAFETY: the kernel returned a fresh descriptor that nothing else owns.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

/// Move the mount at `from_path` (relative to `from_dirfd`) onto `to_path`
///
/// Both paths are always passed as strings, possibly empty. To attach a tree
/// returned by [`open_tree`], pass its fd as `from_dirfd`, an empty
/// `from_path` and `MoveMountFlags::F_EMPTY_PATH`.
///
/// # Errors
/// [`lxns_core::Error::Unsupported`] without kernel support, otherwise the
/// kernel errno: `EPERM` without `CAP_SYS_ADMIN`, `ENOENT` for a missing
/// path, `EINVAL` when the source is not a mount.
#[cfg(target_os = "linux")]
pub fn move_mount<P1, P2>(
    from_dirfd: DirFd<'_>,
    from_path: &P1,
    to_dirfd: DirFd<'_>,
    to_path: &P2,
    flags: MoveMountFlags,
) -> Result<()>
where
    P1: ?Sized + NixPath,
    P2: ?Sized + NixPath,
{
    use lxns_core::{SyscallResultExt, check};

    probe::ensure_supported("move_mount")?;

    let ret = from_path
        .with_nix_path(|from| {
            to_path.with_nix_path(|to| {
                // SAFETY: both paths are NUL-terminated strings that outlive
                // the call; the kernel only reads them.
                unsafe {
                    libc::syscall(
                        libc::SYS_move_mount,
                        from_dirfd.as_raw_fd(),
                        from.as_ptr(),
                        to_dirfd.as_raw_fd(),
                        to.as_ptr(),
                        flags.bits(),
                    )
                }
            })
        })
        .and_then(|inner| inner)
        .with_op("move_mount")?;

    check("move_mount", ret)
        .inspect_err(|e| tracing::warn!(?flags, error = %e, "move_mount failed"))?;

    tracing::debug!(
        from_fd = from_dirfd.as_raw_fd(),
        to_fd = to_dirfd.as_raw_fd(),
        ?flags,
        "moved mount"
    );
    Ok(())
}

/// `open_tree` stub for targets without the mount API
///
/// # Errors
/// Always [`Error::Unsupported`].
#[cfg(not(target_os = "linux"))]
pub fn open_tree<P: ?Sized + NixPath>(
    _dirfd: DirFd<'_>,
    _path: Option<&P>,
    _flags: OpenTreeFlags,
) -> Result<OwnedFd> {
    Err(Error::Unsupported {
        syscall: "open_tree",
    })
}

/// `move_mount` stub for targets without the mount API
///
/// # Errors
/// Always [`Error::Unsupported`].
#[cfg(not(target_os = "linux"))]
pub fn move_mount<P1, P2>(
    _from_dirfd: DirFd<'_>,
    _from_path: &P1,
    _to_dirfd: DirFd<'_>,
    _to_path: &P2,
    _flags: MoveMountFlags,
) -> Result<()>
where
    P1: ?Sized + NixPath,
    P2: ?Sized + NixPath,
{
    Err(Error::Unsupported {
        syscall: "move_mount",
    })
}
