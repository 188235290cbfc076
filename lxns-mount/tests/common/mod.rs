//! Forked-child harness for tests that need their own mount namespace

#![allow(dead_code)]

use std::panic::{AssertUnwindSafe, catch_unwind};

use lxns_namespace::{CloneFlags, unshare};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, fork};

/// Exit code of a child that lacks the kernel features it needs
pub const SKIP: i32 = 77;

/// Run `body` in a forked child and fail unless it exits 0 or [`SKIP`]
pub fn assert_child_succeeds<F: FnOnce() -> i32>(body: F) {
    // SAFETY: the child runs `body` and leaves through _exit without returning
    // into the test harness.
    let code = match unsafe { fork() }.expect("fork failed") {
        ForkResult::Child => {
            let code = catch_unwind(AssertUnwindSafe(body)).unwrap_or(101);
            // SAFETY: _exit is async-signal-safe.
            unsafe { libc::_exit(code) }
        }
        ForkResult::Parent { child } => match waitpid(child, None).expect("waitpid failed") {
            WaitStatus::Exited(_, code) => code,
            status => panic!("child did not exit normally: {status:?}"),
        },
    };

    match code {
        0 => {}
        SKIP => eprintln!("skipped: user namespaces or mount API unavailable"),
        code => panic!("child failed with exit code {code}"),
    }
}

/// Enter fresh user and mount namespaces, or leave the child with [`SKIP`]
pub fn enter_private_mount_namespace() {
    if unshare(CloneFlags::NEWUSER | CloneFlags::NEWNS).is_err() || !lxns_mount::mount_api_supported() {
        // SAFETY: _exit is async-signal-safe.
        unsafe { libc::_exit(SKIP) }
    }
}
