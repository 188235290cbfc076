//! Bind command implementation
//!
//! The source is cloned in a private copy of our mount namespace, then
//! attached inside the target's mount namespace. The copy must be owned by the
//! user namespace that owns the target's mount namespace, which is not
//! necessarily the user namespace the target runs in.

use std::path::Path;

use anyhow::{Context, Result};
use lxns_core::{NamespaceKind, ProcessId};
use lxns_mount::ClonedTree;
use lxns_namespace::{Namespace, NamespaceKindExt};

pub fn execute(pid: i32, recursive: bool, source: &Path, target: &Path) -> Result<()> {
    let pid = ProcessId::from_raw(pid);

    // Both must be opened before we lose access to /proc/<pid>
    let mntns = Namespace::from_pid(NamespaceKind::Mount, pid)
        .with_context(|| format!("failed to open mount namespace of process {pid}"))?;
    let userns = mntns
        .user_namespace()
        .with_context(|| format!("failed to open owner of mount namespace of process {pid}"))?;

    if userns.ns_id()? != NamespaceKind::User.current_ns_id()? {
        userns
            .setns()
            .context("failed to join owner of target mount namespace")?;
    }
    NamespaceKind::Mount
        .unshare()
        .context("failed to create a private mount namespace")?;

    let tree = if recursive {
        ClonedTree::recursive(source)
    } else {
        ClonedTree::new(source)
    }
    .with_context(|| format!("failed to clone {}", source.display()))?;

    mntns.setns().context("failed to join target mount namespace")?;
    tree.mount(target)
        .with_context(|| format!("failed to mount on {}", target.display()))?;

    tracing::info!(
        %pid,
        source = %source.display(),
        target = %target.display(),
        "bind mount added"
    );
    println!("Mounted {} on {} in process {pid}", source.display(), target.display());
    Ok(())
}
