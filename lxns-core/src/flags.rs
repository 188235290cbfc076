//! Typed flag sets
//!
//! Each syscall gets its own bitmask type so a flag meant for one call cannot
//! be handed to another. Unknown bits are kept as-is: validating flag
//! combinations is the kernel's job, and it reports `EINVAL` for bits it does
//! not understand. Build such values with `from_bits_retain`.

use std::ops::BitOr;

use bitflags::bitflags;
use libc::{c_int, c_uint};

use crate::consts;

bitflags! {
    /// Flags for `unshare(2)` and `setns(2)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CloneFlags: c_int {
        /// `CLONE_FILES`
        const FILES = consts::CLONE_FILES;
        /// `CLONE_FS`
        const FS = consts::CLONE_FS;
        /// `CLONE_NEWCGROUP`
        const NEWCGROUP = consts::CLONE_NEWCGROUP;
        /// `CLONE_NEWIPC`
        const NEWIPC = consts::CLONE_NEWIPC;
        /// `CLONE_NEWNET`
        const NEWNET = consts::CLONE_NEWNET;
        /// `CLONE_NEWNS`
        const NEWNS = consts::CLONE_NEWNS;
        /// `CLONE_NEWPID`
        const NEWPID = consts::CLONE_NEWPID;
        /// `CLONE_NEWTIME`
        const NEWTIME = consts::CLONE_NEWTIME;
        /// `CLONE_NEWUSER`
        const NEWUSER = consts::CLONE_NEWUSER;
        /// `CLONE_NEWUTS`
        const NEWUTS = consts::CLONE_NEWUTS;
        /// `CLONE_SYSVSEM`
        const SYSVSEM = consts::CLONE_SYSVSEM;
    }
}

bitflags! {
    /// Path resolution modifiers (`AT_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AtFlags: c_uint {
        /// `AT_EMPTY_PATH`
        const EMPTY_PATH = consts::AT_EMPTY_PATH;
        /// `AT_NO_AUTOMOUNT`
        const NO_AUTOMOUNT = consts::AT_NO_AUTOMOUNT;
        /// `AT_SYMLINK_NOFOLLOW`
        const SYMLINK_NOFOLLOW = consts::AT_SYMLINK_NOFOLLOW;
        /// `AT_RECURSIVE`
        const RECURSIVE = consts::AT_RECURSIVE;
    }
}

bitflags! {
    /// Flags for `open_tree(2)`
    ///
    /// Accepts the `OPEN_TREE_*` flags plus the path resolution modifiers,
    /// which can be mixed in from [`AtFlags`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenTreeFlags: c_uint {
        /// `OPEN_TREE_CLONE`
        const CLONE = consts::OPEN_TREE_CLONE;
        /// `OPEN_TREE_CLOEXEC`
        const CLOEXEC = consts::OPEN_TREE_CLOEXEC;
        /// `AT_EMPTY_PATH`
        const EMPTY_PATH = consts::AT_EMPTY_PATH;
        /// `AT_NO_AUTOMOUNT`
        const NO_AUTOMOUNT = consts::AT_NO_AUTOMOUNT;
        /// `AT_SYMLINK_NOFOLLOW`
        const SYMLINK_NOFOLLOW = consts::AT_SYMLINK_NOFOLLOW;
        /// `AT_RECURSIVE`
        const RECURSIVE = consts::AT_RECURSIVE;
    }
}

bitflags! {
    /// Flags for `move_mount(2)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveMountFlags: c_uint {
        /// `MOVE_MOUNT_F_SYMLINKS`
        const F_SYMLINKS = consts::MOVE_MOUNT_F_SYMLINKS;
        /// `MOVE_MOUNT_F_AUTOMOUNTS`
        const F_AUTOMOUNTS = consts::MOVE_MOUNT_F_AUTOMOUNTS;
        /// `MOVE_MOUNT_F_EMPTY_PATH`
        const F_EMPTY_PATH = consts::MOVE_MOUNT_F_EMPTY_PATH;
        /// `MOVE_MOUNT_T_SYMLINKS`
        const T_SYMLINKS = consts::MOVE_MOUNT_T_SYMLINKS;
        /// `MOVE_MOUNT_T_AUTOMOUNTS`
        const T_AUTOMOUNTS = consts::MOVE_MOUNT_T_AUTOMOUNTS;
        /// `MOVE_MOUNT_T_EMPTY_PATH`
        const T_EMPTY_PATH = consts::MOVE_MOUNT_T_EMPTY_PATH;
    }
}

impl From<AtFlags> for OpenTreeFlags {
    fn from(flags: AtFlags) -> Self {
        Self::from_bits_retain(flags.bits())
    }
}

impl BitOr<AtFlags> for OpenTreeFlags {
    type Output = Self;

    fn bitor(self, rhs: AtFlags) -> Self {
        Self::from_bits_retain(self.bits() | rhs.bits())
    }
}

impl From<CloneFlags> for nix::sched::CloneFlags {
    fn from(flags: CloneFlags) -> Self {
        Self::from_bits_retain(flags.bits())
    }
}
