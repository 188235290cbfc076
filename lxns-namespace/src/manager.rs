//! Namespace lifecycle management

use std::fmt;

use lxns_core::{NamespaceKind, ProcessId, Result};
use nix::errno::Errno;
use serde::Serialize;

use crate::config::NamespaceConfig;
use crate::control;
use crate::namespace::{Namespace, NamespaceKindExt};

/// Creates the configured namespaces for the calling process, or joins the
/// namespaces of another process
#[derive(Debug)]
pub struct NamespaceManager {
    config: NamespaceConfig,
    created: bool,
}

impl NamespaceManager {
    /// Create a new namespace manager
    #[must_use]
    pub const fn new(config: NamespaceConfig) -> Self {
        Self {
            config,
            created: false,
        }
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Check if namespaces have been created
    #[must_use]
    pub const fn is_created(&self) -> bool {
        self.created
    }

    /// Create the configured namespaces with a single `unshare(2)`
    ///
    /// PID and time namespaces only apply to children forked afterwards.
    /// Calling this twice is a no-op.
    ///
    /// # Errors
    /// Errors returned by `unshare(2)`, typically `EPERM` or `EINVAL`.
    pub fn create(&mut self) -> Result<()> {
        if self.created {
            tracing::warn!("namespaces already created");
            return Ok(());
        }

        let enabled = self.config.enabled_namespaces();
        if enabled.is_empty() {
            tracing::warn!("no namespaces enabled");
            return Ok(());
        }

        tracing::info!(namespaces = ?enabled, "creating namespaces");
        control::unshare_namespaces(&self.config)?;

        if self.config.pid || self.config.time {
            tracing::debug!("pid and time namespaces will apply to child processes");
        }

        self.created = true;
        Ok(())
    }

    /// Join every namespace of process `pid` the caller is not already in
    ///
    /// All namespace files are opened before the first `setns(2)`, and the user
    /// namespace is joined first so that the others can be entered with the
    /// capabilities it grants. Kinds the kernel does not support are skipped.
    /// Returns the kinds that were actually joined.
    ///
    /// # Errors
    /// Fails if a namespace file cannot be opened or a `setns(2)` fails. The
    /// caller may be left in some of the target namespaces.
    pub fn enter(&self, pid: ProcessId) -> Result<Vec<NamespaceKind>> {
        let mut targets = Vec::with_capacity(NamespaceKind::JOIN_ORDER.len());

        for kind in NamespaceKind::JOIN_ORDER {
            let ns = match Namespace::from_pid(kind, pid) {
                Ok(ns) => ns,
                // A missing process already fails on the user namespace
                Err(e) if e.errno() == Some(Errno::ENOENT) && kind != NamespaceKind::User => {
                    tracing::debug!(%kind, "namespace kind not supported, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };

            // setns into the current user namespace fails with EINVAL
            if ns.ns_id()? == kind.current_ns_id()? {
                tracing::trace!(%kind, "already in target namespace");
                continue;
            }
            targets.push(ns);
        }

        let mut joined = Vec::with_capacity(targets.len());
        for ns in &targets {
            ns.setns()?;
            joined.push(ns.kind());
        }

        tracing::info!(%pid, namespaces = ?joined, "entered namespaces");
        Ok(joined)
    }

    /// Get namespace ids of the calling process
    ///
    /// # Errors
    /// Fails if no namespace file of the process is readable.
    pub fn current_namespaces(&self) -> Result<NamespaceInfo> {
        Self::namespaces_for_pid(ProcessId::current())
    }

    /// Get namespace ids of process `pid`
    ///
    /// Entries the caller may not inspect are left out.
    ///
    /// # Errors
    /// Fails if no namespace file of the process is readable.
    pub fn namespaces_for_pid(pid: ProcessId) -> Result<NamespaceInfo> {
        let mut entries = Vec::with_capacity(NamespaceKind::ALL.len());
        let mut last_error = None;

        for kind in NamespaceKind::ALL {
            match Namespace::from_pid(kind, pid) {
                Ok(ns) => entries.push(NamespaceEntry::from_namespace(&ns)?),
                Err(e) => {
                    tracing::trace!(%pid, %kind, error = %e, "namespace not readable");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if entries.is_empty() => Err(e),
            _ => Ok(NamespaceInfo { pid, entries }),
        }
    }
}

/// One namespace of a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceEntry {
    /// Namespace kind
    pub kind: NamespaceKind,
    /// Namespace identifier (nsfs inode)
    pub id: u64,
    /// Creator of the owning user namespace, if visible
    pub owner_uid: Option<u32>,
    /// Parent namespace id, for PID and user namespaces with a visible parent
    pub parent_id: Option<u64>,
}

impl NamespaceEntry {
    fn from_namespace(ns: &Namespace) -> Result<Self> {
        let parent_id = if ns.kind().is_hierarchical() {
            // EPERM at the root of the hierarchy visible to us
            ns.parent().and_then(|parent| parent.ns_id()).ok()
        } else {
            None
        };

        Ok(Self {
            kind: ns.kind(),
            id: ns.ns_id()?,
            owner_uid: ns.owner_uid().ok(),
            parent_id,
        })
    }
}

/// Namespace ids of one process
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceInfo {
    /// Process the snapshot was taken from
    pub pid: ProcessId,
    /// Readable namespaces, in [`NamespaceKind::ALL`] order
    pub entries: Vec<NamespaceEntry>,
}

impl NamespaceInfo {
    /// Entry for `kind`, if it was readable
    #[must_use]
    pub fn get(&self, kind: NamespaceKind) -> Option<&NamespaceEntry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    /// Namespace id for `kind`, if it was readable
    #[must_use]
    pub fn id(&self, kind: NamespaceKind) -> Option<u64> {
        self.get(kind).map(|entry| entry.id)
    }

    /// Kinds in which this process and `other` are in different namespaces
    ///
    /// Kinds missing from either snapshot are not compared.
    #[must_use]
    pub fn differing_kinds(&self, other: &Self) -> Vec<NamespaceKind> {
        self.entries
            .iter()
            .filter(|entry| other.id(entry.kind).is_some_and(|id| id != entry.id))
            .map(|entry| entry.kind)
            .collect()
    }

    /// Check if in a different PID, network or mount namespace than init (PID 1)
    ///
    /// # Errors
    /// Fails if the namespaces of PID 1 cannot be read, usually for lack of
    /// privilege.
    pub fn is_isolated(&self) -> Result<bool> {
        let init = NamespaceManager::namespaces_for_pid(ProcessId::from_raw(1))?;
        let isolating = [NamespaceKind::Pid, NamespaceKind::Network, NamespaceKind::Mount];

        Ok(isolating
            .into_iter()
            .any(|kind| self.id(kind) != init.id(kind)))
    }
}

impl fmt::Display for NamespaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Namespaces of process {}:", self.pid)?;
        for entry in &self.entries {
            write!(f, "  {:<7} {}", entry.kind.proc_name(), entry.id)?;
            if let Some(uid) = entry.owner_uid {
                write!(f, " owner={uid}")?;
            }
            if let Some(parent) = entry.parent_id {
                write!(f, " parent={parent}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
