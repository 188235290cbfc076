//! Info command implementation

use anyhow::{Context, Result};
use lxns_core::ProcessId;
use lxns_namespace::NamespaceManager;

pub fn execute(pid: Option<i32>, json: bool) -> Result<()> {
    let target = pid.map_or_else(ProcessId::current, ProcessId::from_raw);

    let info = NamespaceManager::namespaces_for_pid(target)
        .with_context(|| format!("failed to read namespaces of process {target}"))?;

    if json {
        let output = serde_json::to_string_pretty(&info).context("failed to serialize namespaces")?;
        println!("{output}");
        return Ok(());
    }

    print!("{info}");

    match info.is_isolated() {
        Ok(true) => println!("Isolated from init (PID 1)"),
        Ok(false) => println!("Shares namespaces with init (PID 1)"),
        Err(e) => tracing::debug!(error = %e, "cannot compare with init"),
    }

    Ok(())
}
