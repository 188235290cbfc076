//! Owned namespace handles
//!
//! [`Namespace`] owns the fd of one namespace and remembers its kind. The fd is
//! closed when the handle is dropped.

use std::fmt;
use std::fs::File;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use lxns_core::{Error, NamespaceKind, ProcessId, Result};

use crate::{control, introspect};

/// Path of the namespace file of `kind` for a process (`None` = the caller)
#[must_use]
pub fn proc_ns_path(pid: Option<ProcessId>, kind: NamespaceKind) -> PathBuf {
    let process = pid.map_or_else(|| "self".to_string(), |pid| pid.to_string());
    PathBuf::from(format!("/proc/{process}/ns/{}", kind.proc_name()))
}

/// Path of the per-user-namespace limit for `kind`
#[must_use]
pub fn limit_path(kind: NamespaceKind) -> PathBuf {
    PathBuf::from(format!(
        "/proc/sys/user/max_{}_namespaces",
        kind.proc_name()
    ))
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// An open namespace of a known kind
#[derive(Debug)]
pub struct Namespace {
    fd: OwnedFd,
    kind: NamespaceKind,
}

impl Namespace {
    /// Wrap an fd, checking with `NS_GET_NSTYPE` that it is a `kind` namespace
    ///
    /// # Errors
    /// [`Error::KindMismatch`] for a namespace of another kind; the kernel
    /// errno if `fd` is not a namespace at all.
    pub fn from_fd(kind: NamespaceKind, fd: OwnedFd) -> Result<Self> {
        let found = introspect::ns_get_nstype(&fd)?;
        if found != kind {
            return Err(Error::KindMismatch {
                expected: kind,
                found,
            });
        }
        Ok(Self { fd, kind })
    }

    /// Open the `kind` namespace of a process
    ///
    /// # Errors
    /// Fails if `/proc/<pid>/ns/<kind>` cannot be opened, typically because
    /// the process is gone or not ptrace-accessible.
    pub fn from_pid(kind: NamespaceKind, pid: ProcessId) -> Result<Self> {
        Self::open(kind, &proc_ns_path(Some(pid), kind))
    }

    /// Open the caller's current `kind` namespace
    ///
    /// # Errors
    /// Fails if `/proc/self/ns/<kind>` cannot be opened.
    pub fn from_self(kind: NamespaceKind) -> Result<Self> {
        Self::open(kind, &proc_ns_path(None, kind))
    }

    /// Open a namespace file (`/proc/<pid>/ns/*` or a bind mount of one)
    ///
    /// # Errors
    /// Fails if the file cannot be opened or is not a `kind` namespace.
    pub fn open(kind: NamespaceKind, path: &Path) -> Result<Self> {
        // std opens with O_CLOEXEC
        let file = File::open(path).map_err(io_error(path))?;
        tracing::trace!(path = %path.display(), %kind, "opened namespace file");
        Self::from_fd(kind, file.into())
    }

    /// Kind of this namespace
    #[must_use]
    pub const fn kind(&self) -> NamespaceKind {
        self.kind
    }

    /// Move the calling thread into this namespace
    ///
    /// # Errors
    /// Errors returned by `setns(2)`.
    pub fn setns(&self) -> Result<()> {
        control::setns(&self.fd, Some(self.kind))
    }

    /// Open the user namespace that owns this namespace
    ///
    /// # Errors
    /// Errors returned by `NS_GET_USERNS`.
    pub fn user_namespace(&self) -> Result<Self> {
        Ok(Self {
            fd: introspect::ns_get_userns(&self.fd)?,
            kind: NamespaceKind::User,
        })
    }

    /// Open the parent namespace (PID and user namespaces only)
    ///
    /// # Errors
    /// Errors returned by `NS_GET_PARENT`.
    pub fn parent(&self) -> Result<Self> {
        Ok(Self {
            fd: introspect::ns_get_parent(&self.fd)?,
            kind: self.kind,
        })
    }

    /// UID owning this namespace
    ///
    /// For a user namespace that is its creator; for other kinds, the creator
    /// of the owning user namespace.
    ///
    /// # Errors
    /// Errors returned by `NS_GET_OWNER_UID` or `NS_GET_USERNS`.
    pub fn owner_uid(&self) -> Result<u32> {
        if self.kind == NamespaceKind::User {
            introspect::ns_get_owner_uid(&self.fd)
        } else {
            introspect::ns_get_owner_uid(self.user_namespace()?)
        }
    }

    /// Unique namespace identifier (nsfs inode number)
    ///
    /// # Errors
    /// Errors returned by `fstat(2)`.
    pub fn ns_id(&self) -> Result<u64> {
        introspect::ns_id(&self.fd)
    }

    /// Release the fd to the caller
    #[must_use]
    pub fn into_fd(self) -> OwnedFd {
        self.fd
    }
}

impl AsFd for Namespace {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for Namespace {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl From<Namespace> for OwnedFd {
    fn from(ns: Namespace) -> Self {
        ns.fd
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ns_id() {
            Ok(id) => write!(f, "<{} id={id}>", self.kind),
            Err(_) => write!(f, "<{} id=?>", self.kind),
        }
    }
}

/// Per-kind operations that do not need an open namespace
pub trait NamespaceKindExt {
    /// Create a namespace of this kind and move the caller into it
    ///
    /// # Errors
    /// Errors returned by `unshare(2)`.
    fn unshare(self) -> Result<()>;

    /// Identifier of the caller's current namespace of this kind
    ///
    /// # Errors
    /// Fails if `/proc/self/ns/<kind>` cannot be stat'ed.
    fn current_ns_id(self) -> Result<u64>;

    /// Maximum number of namespaces of this kind in the caller's user namespace
    ///
    /// # Errors
    /// Fails if the sysctl cannot be read or parsed.
    fn current_limit(self) -> Result<u64>;

    /// Change the limit returned by [`NamespaceKindExt::current_limit`]
    ///
    /// The limit is inherited by child user namespaces created afterwards.
    ///
    /// # Errors
    /// Fails if the sysctl cannot be written, usually for lack of privilege.
    fn set_current_limit(self, limit: u64) -> Result<()>;
}

impl NamespaceKindExt for NamespaceKind {
    fn unshare(self) -> Result<()> {
        control::unshare(self.clone_flag())
    }

    fn current_ns_id(self) -> Result<u64> {
        let path = proc_ns_path(None, self);
        let metadata = std::fs::metadata(&path).map_err(io_error(&path))?;
        Ok(metadata.ino())
    }

    fn current_limit(self) -> Result<u64> {
        let path = limit_path(self);
        let raw = std::fs::read_to_string(&path).map_err(io_error(&path))?;
        raw.trim()
            .parse()
            .map_err(|e| io_error(&path)(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn set_current_limit(self, limit: u64) -> Result<()> {
        let path = limit_path(self);
        std::fs::write(&path, limit.to_string()).map_err(io_error(&path))?;
        tracing::debug!(kind = %self, limit, "changed namespace limit");
        Ok(())
    }
}
