//! Unshare command implementation

use anyhow::{Context, Result};
use lxns_core::NamespaceKind;
use lxns_namespace::{NamespaceConfig, NamespaceManager};

pub fn execute(namespaces: &[NamespaceKind], all: bool, command: &[String]) -> Result<()> {
    let config = if all {
        NamespaceConfig::all()
    } else {
        NamespaceConfig::from_kinds(namespaces.iter().copied())
    };

    let mut manager = NamespaceManager::new(config);
    manager
        .create()
        .with_context(|| format!("failed to unshare {:?}", manager.config().enabled_namespaces()))?;

    if manager.config().pid || manager.config().time {
        super::spawn_and_exit(command)
    } else {
        super::exec(command)
    }
}
