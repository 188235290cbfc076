//! Limits command implementation

use anyhow::{Context, Result};
use lxns_core::NamespaceKind;
use lxns_namespace::NamespaceKindExt;

pub fn execute(set: Option<u64>, kinds: &[NamespaceKind]) -> Result<()> {
    let kinds: &[NamespaceKind] = if kinds.is_empty() {
        &NamespaceKind::ALL
    } else {
        kinds
    };

    if let Some(limit) = set {
        for kind in kinds {
            kind.set_current_limit(limit)
                .with_context(|| format!("failed to set {kind} namespace limit"))?;
        }
    }

    for kind in kinds {
        let limit = kind
            .current_limit()
            .with_context(|| format!("failed to read {kind} namespace limit"))?;
        println!("{:<7} {limit}", kind.proc_name());
    }

    Ok(())
}
