//! Core type definitions with strong typing

use libc::c_int;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::str::FromStr;

use crate::flags::CloneFlags;
use crate::{Error, Result};

/// Kind of a Linux namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceKind {
    /// Cgroup root directory
    #[serde(rename = "cgroup")]
    Cgroup,
    /// System V IPC and POSIX message queues
    #[serde(rename = "ipc")]
    Ipc,
    /// Network devices, stacks and ports
    #[serde(rename = "net")]
    Network,
    /// Mount points
    #[serde(rename = "mnt")]
    Mount,
    /// Process IDs
    #[serde(rename = "pid")]
    Pid,
    /// Boot and monotonic clocks
    #[serde(rename = "time")]
    Time,
    /// User and group IDs
    #[serde(rename = "user")]
    User,
    /// Hostname and NIS domain name
    #[serde(rename = "uts")]
    Uts,
}

impl NamespaceKind {
    /// All namespace kinds
    pub const ALL: [Self; 8] = [
        Self::Cgroup,
        Self::Ipc,
        Self::Network,
        Self::Mount,
        Self::Pid,
        Self::Time,
        Self::User,
        Self::Uts,
    ];

    /// All namespace kinds, user namespace first
    ///
    /// Entering the owning user namespace first grants the capabilities
    /// needed to enter the others.
    pub const JOIN_ORDER: [Self; 8] = [
        Self::User,
        Self::Cgroup,
        Self::Ipc,
        Self::Network,
        Self::Mount,
        Self::Pid,
        Self::Time,
        Self::Uts,
    ];

    /// Clone flag selecting this kind
    #[must_use]
    pub const fn clone_flag(self) -> CloneFlags {
        match self {
            Self::Cgroup => CloneFlags::NEWCGROUP,
            Self::Ipc => CloneFlags::NEWIPC,
            Self::Network => CloneFlags::NEWNET,
            Self::Mount => CloneFlags::NEWNS,
            Self::Pid => CloneFlags::NEWPID,
            Self::Time => CloneFlags::NEWTIME,
            Self::User => CloneFlags::NEWUSER,
            Self::Uts => CloneFlags::NEWUTS,
        }
    }

    /// Raw kind constant as reported by `NS_GET_NSTYPE`
    #[must_use]
    pub const fn raw(self) -> c_int {
        self.clone_flag().bits()
    }

    /// Map a raw kind constant back to a kind
    #[must_use]
    pub const fn from_raw(raw: c_int) -> Option<Self> {
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::ALL[i].raw() == raw {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// Entry name under `/proc/<pid>/ns/`
    #[must_use]
    pub const fn proc_name(self) -> &'static str {
        match self {
            Self::Cgroup => "cgroup",
            Self::Ipc => "ipc",
            Self::Network => "net",
            Self::Mount => "mnt",
            Self::Pid => "pid",
            Self::Time => "time",
            Self::User => "user",
            Self::Uts => "uts",
        }
    }

    /// Whether namespaces of this kind form a parent/child hierarchy
    #[must_use]
    pub const fn is_hierarchical(self) -> bool {
        matches!(self, Self::Pid | Self::User)
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proc_name())
    }
}

impl FromStr for NamespaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cgroup" => Ok(Self::Cgroup),
            "ipc" => Ok(Self::Ipc),
            "net" | "network" => Ok(Self::Network),
            "mnt" | "mount" => Ok(Self::Mount),
            "pid" => Ok(Self::Pid),
            "time" => Ok(Self::Time),
            "user" => Ok(Self::User),
            "uts" => Ok(Self::Uts),
            other => Err(Error::UnknownNamespaceName(other.to_string())),
        }
    }
}

impl TryFrom<c_int> for NamespaceKind {
    type Error = Error;

    fn try_from(raw: c_int) -> Result<Self> {
        Self::from_raw(raw).ok_or(Error::UnknownNamespaceKind(raw))
    }
}

/// Directory a relative path is resolved against
#[derive(Debug, Clone, Copy, Default)]
pub enum DirFd<'fd> {
    /// The current working directory (`AT_FDCWD`)
    #[default]
    Cwd,
    /// An open directory, or any fd when combined with an empty-path flag
    Fd(BorrowedFd<'fd>),
}

impl<'fd> DirFd<'fd> {
    /// Borrow any fd-like object as a dirfd
    pub fn from_fd<F: AsFd + ?Sized>(fd: &'fd F) -> Self {
        Self::Fd(fd.as_fd())
    }

    /// Raw value passed to the kernel
    #[must_use]
    pub fn as_raw_fd(&self) -> RawFd {
        match self {
            Self::Cwd => libc::AT_FDCWD,
            Self::Fd(fd) => fd.as_raw_fd(),
        }
    }
}

impl<'fd> From<BorrowedFd<'fd>> for DirFd<'fd> {
    fn from(fd: BorrowedFd<'fd>) -> Self {
        Self::Fd(fd)
    }
}

/// Process identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ProcessId(i32);

impl ProcessId {
    /// Create from raw PID
    #[must_use]
    pub const fn from_raw(pid: i32) -> Self {
        Self(pid)
    }

    /// Get the current process ID
    #[must_use]
    pub fn current() -> Self {
        #[allow(clippy::cast_possible_wrap)]
        Self(std::process::id() as i32)
    }

    /// Get raw PID value
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<nix::unistd::Pid> for ProcessId {
    fn from(pid: nix::unistd::Pid) -> Self {
        Self(pid.as_raw())
    }
}

impl From<ProcessId> for nix::unistd::Pid {
    fn from(pid: ProcessId) -> Self {
        nix::unistd::Pid::from_raw(pid.0)
    }
}
