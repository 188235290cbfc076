//! Namespace selection

use lxns_core::{CloneFlags, NamespaceKind};
use serde::{Deserialize, Serialize};

/// Which namespace kinds to create with `unshare(2)`
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Enable cgroup namespace
    pub cgroup: bool,

    /// Enable IPC namespace
    pub ipc: bool,

    /// Enable network namespace
    pub network: bool,

    /// Enable mount namespace
    pub mount: bool,

    /// Enable PID namespace (applies to children)
    pub pid: bool,

    /// Enable time namespace (applies to children)
    pub time: bool,

    /// Enable user namespace
    pub user: bool,

    /// Enable UTS namespace (hostname)
    pub uts: bool,
}

impl NamespaceConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable every namespace kind
    #[must_use]
    pub fn all() -> Self {
        Self::from_kinds(NamespaceKind::ALL)
    }

    /// User and mount namespaces, enough to manipulate mounts without root
    #[must_use]
    pub fn rootless_mount() -> Self {
        Self::new().with_user(true).with_mount(true)
    }

    /// Enable exactly the given kinds
    #[must_use]
    pub fn from_kinds(kinds: impl IntoIterator<Item = NamespaceKind>) -> Self {
        kinds
            .into_iter()
            .fold(Self::new(), |config, kind| config.with_kind(kind, true))
    }

    /// Enable or disable one kind
    #[must_use]
    pub fn with_kind(mut self, kind: NamespaceKind, enable: bool) -> Self {
        *self.flag_mut(kind) = enable;
        self
    }

    /// Enable cgroup namespace
    #[must_use]
    pub fn with_cgroup(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Cgroup, enable)
    }

    /// Enable IPC namespace
    #[must_use]
    pub fn with_ipc(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Ipc, enable)
    }

    /// Enable network namespace
    #[must_use]
    pub fn with_network(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Network, enable)
    }

    /// Enable mount namespace
    #[must_use]
    pub fn with_mount(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Mount, enable)
    }

    /// Enable PID namespace
    #[must_use]
    pub fn with_pid(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Pid, enable)
    }

    /// Enable time namespace
    #[must_use]
    pub fn with_time(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Time, enable)
    }

    /// Enable user namespace
    #[must_use]
    pub fn with_user(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::User, enable)
    }

    /// Enable UTS namespace
    #[must_use]
    pub fn with_uts(self, enable: bool) -> Self {
        self.with_kind(NamespaceKind::Uts, enable)
    }

    /// Check if `kind` is enabled
    #[must_use]
    pub const fn is_enabled(&self, kind: NamespaceKind) -> bool {
        match kind {
            NamespaceKind::Cgroup => self.cgroup,
            NamespaceKind::Ipc => self.ipc,
            NamespaceKind::Network => self.network,
            NamespaceKind::Mount => self.mount,
            NamespaceKind::Pid => self.pid,
            NamespaceKind::Time => self.time,
            NamespaceKind::User => self.user,
            NamespaceKind::Uts => self.uts,
        }
    }

    const fn flag_mut(&mut self, kind: NamespaceKind) -> &mut bool {
        match kind {
            NamespaceKind::Cgroup => &mut self.cgroup,
            NamespaceKind::Ipc => &mut self.ipc,
            NamespaceKind::Network => &mut self.network,
            NamespaceKind::Mount => &mut self.mount,
            NamespaceKind::Pid => &mut self.pid,
            NamespaceKind::Time => &mut self.time,
            NamespaceKind::User => &mut self.user,
            NamespaceKind::Uts => &mut self.uts,
        }
    }

    /// Convert to clone flags for unshare(2)
    #[must_use]
    pub fn to_clone_flags(&self) -> CloneFlags {
        self.enabled_namespaces()
            .into_iter()
            .fold(CloneFlags::empty(), |flags, kind| flags | kind.clone_flag())
    }

    /// Check if any namespaces are enabled
    #[must_use]
    pub fn has_any(&self) -> bool {
        NamespaceKind::ALL.into_iter().any(|kind| self.is_enabled(kind))
    }

    /// Get list of enabled namespace kinds
    #[must_use]
    pub fn enabled_namespaces(&self) -> Vec<NamespaceKind> {
        NamespaceKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

impl From<&NamespaceConfig> for CloneFlags {
    fn from(config: &NamespaceConfig) -> Self {
        config.to_clone_flags()
    }
}
