//! Join command implementation

use anyhow::{Context, Result};
use lxns_core::{NamespaceKind, ProcessId};
use lxns_namespace::{NamespaceConfig, NamespaceManager};

pub fn execute(pid: i32, command: &[String]) -> Result<()> {
    let target = ProcessId::from_raw(pid);

    let manager = NamespaceManager::new(NamespaceConfig::default());
    let joined = manager
        .enter(target)
        .with_context(|| format!("failed to join namespaces of process {target}"))?;

    tracing::info!(pid = %target, namespaces = ?joined, "joined namespaces");

    if joined.contains(&NamespaceKind::Pid) || joined.contains(&NamespaceKind::Time) {
        super::spawn_and_exit(command)
    } else {
        super::exec(command)
    }
}
