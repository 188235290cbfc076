use std::fs::File;
use std::io::{Read, Write};

use assert_cmd::Command;
use lxns_namespace::{CloneFlags, unshare};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Gid, Pid, Uid, fork, getgid, getuid, pipe};
use predicates::prelude::*;

fn lxns() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lxns"))
}

fn wait_for(pid: Pid) -> i32 {
    match waitpid(pid, None).unwrap() {
        WaitStatus::Exited(_, code) => code,
        status => panic!("child {pid} did not exit normally: {status:?}"),
    }
}

/// Whether a child of ours may create namespaces of the given kinds
fn can_unshare(flags: CloneFlags) -> bool {
    // SAFETY: the child only unshares before _exit.
    match unsafe { fork() }.unwrap() {
        ForkResult::Child => {
            let code = if unshare(flags).is_ok() { 0 } else { 1 };
            // SAFETY: _exit is async-signal-safe.
            unsafe { libc::_exit(code) }
        }
        ForkResult::Parent { child } => wait_for(child) == 0,
    }
}

/// New user and mount namespaces, then a user namespace nested in the first
///
/// Afterwards the mount namespace is owned by the parent of the caller's user
/// namespace.
fn enter_nested_user_namespace(uid: Uid, gid: Gid) -> anyhow::Result<()> {
    unshare(CloneFlags::NEWUSER | CloneFlags::NEWNS)?;
    std::fs::write("/proc/self/setgroups", "deny")?;
    std::fs::write("/proc/self/uid_map", format!("{uid} {uid} 1"))?;
    std::fs::write("/proc/self/gid_map", format!("{gid} {gid} 1"))?;
    unshare(CloneFlags::NEWUSER)?;
    Ok(())
}

#[test]
fn test_help_command() {
    lxns()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspect, create and join Linux namespaces"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("unshare"))
        .stdout(predicate::str::contains("join"))
        .stdout(predicate::str::contains("bind"))
        .stdout(predicate::str::contains("limits"));
}

#[test]
fn test_version_command() {
    lxns()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lxns"));
}

#[test]
fn test_invalid_command() {
    lxns()
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_info_current_process() {
    lxns()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Namespaces of process"))
        .stdout(predicate::str::contains("user"))
        .stdout(predicate::str::contains("mnt"));
}

#[test]
fn test_info_json() {
    lxns()
        .args(["info", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entries\""))
        .stdout(predicate::str::contains("\"kind\": \"user\""));
}

#[test]
fn test_info_missing_process() {
    lxns()
        .args(["info", "--pid", "2147483647"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read namespaces of process 2147483647"));
}

#[test]
fn test_unshare_requires_namespaces() {
    lxns()
        .args(["unshare", "--", "/bin/true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_unshare_unknown_namespace() {
    lxns()
        .args(["unshare", "--ns", "bogus", "--", "/bin/true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown namespace name"));
}

#[test]
fn test_unshare_user_namespace() {
    let assert = lxns()
        .args(["unshare", "--ns", "user,uts", "--", "/bin/true"])
        .assert();

    // Hosts may forbid unprivileged user namespaces
    if can_unshare(CloneFlags::NEWUSER | CloneFlags::NEWUTS) {
        assert.success();
    } else {
        assert
            .failure()
            .stderr(predicate::str::contains("failed to unshare"));
    }
}

#[test]
fn test_join_own_namespaces_runs_command() {
    // Joining the namespaces we are already in is a no-op
    lxns()
        .args(["join", "--pid", &std::process::id().to_string(), "--", "/bin/echo", "joined"])
        .assert()
        .success()
        .stdout(predicate::str::contains("joined"));
}

#[test]
fn test_join_without_pid() {
    lxns()
        .args(["join", "--", "/bin/true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_bind_without_paths() {
    lxns()
        .args(["bind", "--pid", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_bind_into_process_in_nested_user_namespace() {
    if !lxns_mount::mount_api_supported() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source");
    let target = dir.path().join("target");
    std::fs::write(&source, "bound from outside").unwrap();
    std::fs::write(&target, "").unwrap();

    let (uid, gid) = (getuid(), getgid());
    let (ready_read, ready_write) = pipe().unwrap();
    let (release_read, release_write) = pipe().unwrap();

    // SAFETY: the child only sets up namespaces, reports, blocks and reads
    // one file before _exit.
    let holder = match unsafe { fork() }.unwrap() {
        ForkResult::Child => {
            drop(ready_read);
            drop(release_write);
            let status = u8::from(enter_nested_user_namespace(uid, gid).is_ok());
            let _ = File::from(ready_write).write_all(&[status]);
            // Returns once the parent closes its end
            let _ = File::from(release_read).read(&mut [0; 1]);
            let code = match std::fs::read_to_string(&target) {
                Ok(content) if content == "bound from outside" => 0,
                _ => 1,
            };
            // SAFETY: _exit is async-signal-safe.
            unsafe { libc::_exit(code) }
        }
        ForkResult::Parent { child } => child,
    };
    drop(ready_write);
    drop(release_read);

    let mut status = [0; 1];
    File::from(ready_read).read_exact(&mut status).unwrap();
    if status[0] != 1 {
        // Unprivileged user namespaces are unavailable
        drop(release_write);
        wait_for(holder);
        return;
    }

    let output = lxns()
        .args(["bind", "--pid", &holder.to_string()])
        .arg(&source)
        .arg(&target)
        .output()
        .expect("Failed to execute command");
    drop(release_write);
    let seen_by_holder = wait_for(holder);

    assert!(
        output.status.success(),
        "bind failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Mounted"));
    assert_eq!(seen_by_holder, 0, "target does not show the source in the holder");
    // Our own mount namespace is untouched
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "");
}

#[test]
fn test_limits_lists_every_kind() {
    let output = lxns().arg("limits").output().expect("Failed to execute command");

    // Kernels without user namespaces have no limits to show
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("user"), "Expected limits, got: {stdout}");
        assert!(stdout.contains("mnt"), "Expected limits, got: {stdout}");
    }
}

#[test]
fn test_limits_set_requires_kind() {
    lxns()
        .args(["limits", "--set", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
