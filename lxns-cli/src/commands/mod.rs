use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::Command;

use anyhow::{Context, Result};

use crate::cli::Commands;

pub mod bind;
pub mod info;
pub mod join;
pub mod limits;
pub mod unshare;

/// Dispatch command to appropriate handler
pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Info { pid, json } => info::execute(pid, json),

        Commands::Unshare {
            namespaces,
            all,
            command,
        } => unshare::execute(&namespaces, all, &command),

        Commands::Join { pid, command } => join::execute(pid, &command),

        Commands::Bind {
            pid,
            recursive,
            source,
            target,
        } => bind::execute(pid, recursive, &source, &target),

        Commands::Limits { set, kinds } => limits::execute(set, &kinds),
    }
}

/// Build the command to run, falling back to the user's shell
fn build_command(argv: &[String]) -> Command {
    match argv.split_first() {
        Some((program, args)) => {
            let mut command = Command::new(program);
            command.args(args);
            command
        }
        None => Command::new(std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())),
    }
}

/// Replace the current process with `argv`
fn exec(argv: &[String]) -> Result<()> {
    let mut command = build_command(argv);
    tracing::debug!(?command, "executing");

    // Only returns on failure
    let err = command.exec();
    Err::<(), _>(err).with_context(|| format!("failed to execute {:?}", command.get_program()))
}

/// Run `argv` as a child process and exit with its status
///
/// Needed where the new namespaces only apply to children (PID, time).
fn spawn_and_exit(argv: &[String]) -> Result<()> {
    let mut command = build_command(argv);
    tracing::debug!(?command, "spawning");

    let status = command
        .status()
        .with_context(|| format!("failed to execute {:?}", command.get_program()))?;

    // 128 + signal, as shells report it
    let code = status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1);
    std::process::exit(code);
}
