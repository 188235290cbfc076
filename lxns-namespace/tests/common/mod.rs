//! Helpers for tests that change namespaces
//!
//! Namespace changes stick to the process, and creating a user namespace needs
//! a single-threaded one, so such tests run their body in a forked child and
//! report back through the exit code.

#![allow(dead_code)]

use std::panic::{AssertUnwindSafe, catch_unwind};

use lxns_namespace::{CloneFlags, unshare};
use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};

/// Exit code of a child that could not create the namespaces it needs
pub const SKIP: i32 = 77;

/// Install a test-friendly tracing subscriber (once per test binary)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fork and run `body` in the child; returns the child's exit code
pub fn run_in_child<F: FnOnce() -> i32>(body: F) -> i32 {
    // SAFETY: the child runs `body` and leaves through _exit without returning
    // into the test harness.
    match unsafe { fork() }.expect("fork failed") {
        ForkResult::Child => {
            let code = catch_unwind(AssertUnwindSafe(body)).unwrap_or(101);
            // SAFETY: _exit is async-signal-safe.
            unsafe { libc::_exit(code) }
        }
        ForkResult::Parent { child } => wait_for(child),
    }
}

/// Wait for `child` and return its exit code
pub fn wait_for(child: Pid) -> i32 {
    match waitpid(child, None).expect("waitpid failed") {
        WaitStatus::Exited(_, code) => code,
        status => panic!("child did not exit normally: {status:?}"),
    }
}

/// Run `body` in a child and fail the test unless it exits 0 or [`SKIP`]
pub fn assert_child_succeeds<F: FnOnce() -> i32>(body: F) {
    match run_in_child(body) {
        0 => {}
        SKIP => eprintln!("skipped: unprivileged user namespaces unavailable"),
        code => panic!("child failed with exit code {code}"),
    }
}

/// Unshare `flags` or leave the child with [`SKIP`] if the host forbids it
pub fn unshare_or_skip(flags: CloneFlags) {
    if let Err(e) = unshare(flags) {
        match e.errno() {
            Some(Errno::EPERM | Errno::EINVAL | Errno::ENOSPC | Errno::EUSERS | Errno::EACCES) => {
                // SAFETY: _exit is async-signal-safe.
                unsafe { libc::_exit(SKIP) }
            }
            _ => panic!("unshare failed: {e}"),
        }
    }
}

/// The kernel's overflow UID, reported for unmapped users
pub fn overflow_uid() -> u32 {
    std::fs::read_to_string("/proc/sys/kernel/overflowuid")
        .expect("read overflowuid")
        .trim()
        .parse()
        .expect("parse overflowuid")
}
