//! Runtime detection of the mount API (Linux 5.2+)
//!
//! The probe issues one harmless `open_tree` call and caches the answer in a
//! static `OnceLock`. Kernels without the syscall answer `ENOSYS`.

use std::sync::OnceLock;

use lxns_core::{Error, Result};

static MOUNT_API: OnceLock<bool> = OnceLock::new();

/// Check whether the running kernel implements `open_tree` and `move_mount`
#[must_use]
pub fn mount_api_supported() -> bool {
    *MOUNT_API.get_or_init(probe)
}

/// Fail with [`Error::Unsupported`] for `syscall` unless the mount API exists
pub(crate) fn ensure_supported(syscall: &'static str) -> Result<()> {
    if mount_api_supported() {
        Ok(())
    } else {
        tracing::debug!(syscall, "mount API unavailable");
        Err(Error::Unsupported { syscall })
    }
}

#[cfg(target_os = "linux")]
fn probe() -> bool {
    use nix::errno::Errno;

    // A bad dirfd with a NULL path can never succeed
    // SAFETY: open_tree does not write through its arguments.
    let ret = unsafe {
        libc::syscall(
            libc::SYS_open_tree,
            -1 as libc::c_int,
            std::ptr::null::<libc::c_char>(),
            0 as libc::c_uint,
        )
    };
    let supported = ret >= 0 || Errno::last() != Errno::ENOSYS;

    tracing::debug!(supported, "probed mount API");
    supported
}

#[cfg(not(target_os = "linux"))]
const fn probe() -> bool {
    false
}
