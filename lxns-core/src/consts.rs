//! Kernel ABI constants
//!
//! Raw values of the flags accepted by `unshare(2)`, `setns(2)`,
//! `open_tree(2)` and `move_mount(2)`. Values are copied from the kernel uapi
//! headers (`linux/sched.h`, `linux/fcntl.h`, `linux/mount.h`) and are
//! ABI-stable; newer kernels only ever add to this set.
//!
//! Prefer the typed sets in [`crate::flags`] when calling the facade. These
//! raw values exist for callers that receive flags as plain integers.

use libc::{c_int, c_uint};

// Namespace clone flags (linux/sched.h)

/// Share the file descriptor table (`unshare` reverses the sharing).
pub const CLONE_FILES: c_int = 0x0000_0400;
/// Share root, cwd and umask.
pub const CLONE_FS: c_int = 0x0000_0200;
/// New cgroup namespace.
pub const CLONE_NEWCGROUP: c_int = 0x0200_0000;
/// New IPC namespace.
pub const CLONE_NEWIPC: c_int = 0x0800_0000;
/// New network namespace.
pub const CLONE_NEWNET: c_int = 0x4000_0000;
/// New mount namespace.
pub const CLONE_NEWNS: c_int = 0x0002_0000;
/// New PID namespace, effective for children of the caller.
pub const CLONE_NEWPID: c_int = 0x2000_0000;
/// New time namespace, effective for children of the caller.
pub const CLONE_NEWTIME: c_int = 0x0000_0080;
/// New user namespace.
pub const CLONE_NEWUSER: c_int = 0x1000_0000;
/// New UTS namespace.
pub const CLONE_NEWUTS: c_int = 0x0400_0000;
/// Share System V semaphore undo values.
pub const CLONE_SYSVSEM: c_int = 0x0004_0000;

// Path resolution flags (linux/fcntl.h)

/// Operate on the dirfd itself when the path is empty.
pub const AT_EMPTY_PATH: c_uint = 0x1000;
/// Do not trigger automounts on the terminal component.
pub const AT_NO_AUTOMOUNT: c_uint = 0x800;
/// Do not follow a trailing symlink.
pub const AT_SYMLINK_NOFOLLOW: c_uint = 0x100;
/// Apply to the entire subtree.
pub const AT_RECURSIVE: c_uint = 0x8000;

// open_tree(2) flags (linux/mount.h)

/// Detach a clone of the mount instead of referencing the live one.
pub const OPEN_TREE_CLONE: c_uint = 1;
/// Close the returned descriptor on exec. Same value as `O_CLOEXEC`.
#[allow(clippy::cast_sign_loss)]
pub const OPEN_TREE_CLOEXEC: c_uint = libc::O_CLOEXEC as c_uint;

// move_mount(2) flags (linux/mount.h)

/// Follow symlinks on the source path.
pub const MOVE_MOUNT_F_SYMLINKS: c_uint = 0x0000_0001;
/// Follow automounts on the source path.
pub const MOVE_MOUNT_F_AUTOMOUNTS: c_uint = 0x0000_0002;
/// Empty source path refers to the source dirfd.
pub const MOVE_MOUNT_F_EMPTY_PATH: c_uint = 0x0000_0004;
/// Follow symlinks on the destination path.
pub const MOVE_MOUNT_T_SYMLINKS: c_uint = 0x0000_0010;
/// Follow automounts on the destination path.
pub const MOVE_MOUNT_T_AUTOMOUNTS: c_uint = 0x0000_0020;
/// Empty destination path refers to the destination dirfd.
pub const MOVE_MOUNT_T_EMPTY_PATH: c_uint = 0x0000_0040;

// nsfs ioctls (linux/nsfs.h)

/// ioctl type shared by all nsfs requests.
pub const NSIO: u8 = 0xb7;
/// `NS_GET_USERNS` sequence number.
pub const NS_GET_USERNS_NR: u8 = 0x1;
/// `NS_GET_PARENT` sequence number.
pub const NS_GET_PARENT_NR: u8 = 0x2;
/// `NS_GET_NSTYPE` sequence number.
pub const NS_GET_NSTYPE_NR: u8 = 0x3;
/// `NS_GET_OWNER_UID` sequence number.
pub const NS_GET_OWNER_UID_NR: u8 = 0x4;
