//! Error types for lxns
//!
//! Every failure of a wrapped kernel call is reported as [`Error::Os`] with
//! the errno left untouched. The remaining variants cover the handful of
//! checks done in userspace by the higher-level helpers.

use std::io;
use std::path::PathBuf;

use nix::errno::{Errno, ErrnoSentinel};
use thiserror::Error;

/// lxns error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Kernel call failed
    #[error("{op} failed: {source}")]
    Os {
        /// Name of the syscall or ioctl
        op: &'static str,
        /// Errno reported by the kernel
        #[source]
        source: Errno,
    },

    /// Syscall not implemented by the running kernel
    #[error("{syscall} is not supported on this platform")]
    Unsupported {
        /// Name of the missing syscall
        syscall: &'static str,
    },

    /// `NS_GET_NSTYPE` returned a value outside the known namespace kinds
    #[error("unknown namespace type {0:#x}")]
    UnknownNamespaceKind(i32),

    /// Namespace name not recognised
    #[error("unknown namespace name {0:?}")]
    UnknownNamespaceName(String),

    /// File descriptor references a namespace of another kind
    #[error("file descriptor references a {found} namespace, expected {expected}")]
    KindMismatch {
        /// Kind the caller asked for
        expected: crate::NamespaceKind,
        /// Kind reported by the kernel
        found: crate::NamespaceKind,
    },

    /// I/O error on a `/proc` or `/sys` file
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Build an [`Error::Os`]
    #[must_use]
    pub const fn os(op: &'static str, source: Errno) -> Self {
        Self::Os { op, source }
    }

    /// Errno carried by this error, if it came from the kernel
    #[must_use]
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Self::Os { source, .. } => Some(*source),
            Self::Unsupported { .. } => Some(Errno::ENOSYS),
            Self::Io { source, .. } => source.raw_os_error().map(Errno::from_raw),
            _ => None,
        }
    }

    /// Raw errno value, if any
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        self.errno().map(|errno| errno as i32)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io { source, .. } => source,
            other => match other.raw_os_error() {
                Some(code) => Self::from_raw_os_error(code),
                None => Self::new(io::ErrorKind::InvalidInput, other),
            },
        }
    }
}

/// Result type alias for lxns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Map the return value of a raw kernel call to a [`Result`]
///
/// Any sentinel return (`-1` for integers) becomes [`Error::Os`] carrying the
/// thread's current errno. Must be called right after the kernel call, before
/// anything else can clobber errno.
pub fn check<S>(op: &'static str, ret: S) -> Result<S>
where
    S: ErrnoSentinel + PartialEq<S>,
{
    Errno::result(ret).map_err(|source| Error::os(op, source))
}

/// Attach the operation name to a `nix` result
pub trait SyscallResultExt<T> {
    /// Convert the `nix` error into [`Error::Os`] for `op`
    fn with_op(self, op: &'static str) -> Result<T>;
}

impl<T> SyscallResultExt<T> for nix::Result<T> {
    fn with_op(self, op: &'static str) -> Result<T> {
        self.map_err(|source| Error::os(op, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_success_through() {
        assert_eq!(check("getpid", 42_i32).unwrap(), 42);
        assert_eq!(check("syscall", 0_i64).unwrap(), 0);
    }

    #[test]
    fn test_check_maps_sentinel_to_errno() {
        Errno::EBADF.set();
        let err = check("setns", -1_i32).unwrap_err();

        assert_eq!(err.errno(), Some(Errno::EBADF));
        assert_eq!(err.raw_os_error(), Some(libc::EBADF));
        assert!(err.to_string().starts_with("setns failed"));
    }

    #[test]
    fn test_with_op() {
        let res: nix::Result<()> = Err(Errno::EPERM);
        let err = res.with_op("unshare").unwrap_err();

        assert!(matches!(
            err,
            Error::Os {
                op: "unshare",
                source: Errno::EPERM
            }
        ));
    }

    #[test]
    fn test_unsupported_reports_enosys() {
        let err = Error::Unsupported {
            syscall: "open_tree",
        };
        assert_eq!(err.errno(), Some(Errno::ENOSYS));
    }

    #[test]
    fn test_into_io_error_keeps_errno() {
        let io_err: io::Error = Error::os("move_mount", Errno::EXDEV).into();
        assert_eq!(io_err.raw_os_error(), Some(libc::EXDEV));

        let io_err: io::Error = Error::UnknownNamespaceKind(7).into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
    }
}
