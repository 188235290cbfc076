use lxns_core::consts::*;
use lxns_core::*;

#[test]
fn test_typed_flags_carry_table_values() {
    assert_eq!(CloneFlags::NEWUSER.bits(), CLONE_NEWUSER);
    assert_eq!(CloneFlags::NEWTIME.bits(), CLONE_NEWTIME);
    assert_eq!(AtFlags::RECURSIVE.bits(), AT_RECURSIVE);
    assert_eq!(OpenTreeFlags::CLOEXEC.bits(), OPEN_TREE_CLOEXEC);
    assert_eq!(MoveMountFlags::T_EMPTY_PATH.bits(), MOVE_MOUNT_T_EMPTY_PATH);
}

#[test]
fn test_namespace_kinds_are_clone_flags() {
    let mut all = CloneFlags::empty();
    for kind in NamespaceKind::ALL {
        assert!(CloneFlags::all().contains(kind.clone_flag()));
        all |= kind.clone_flag();
    }

    // Everything but the resource-sharing flags
    assert!(!all.contains(CloneFlags::FILES));
    assert!(!all.contains(CloneFlags::FS));
    assert!(!all.contains(CloneFlags::SYSVSEM));
}

#[test]
fn test_kind_from_clone_constant() {
    assert_eq!(
        NamespaceKind::try_from(CLONE_NEWNS).unwrap(),
        NamespaceKind::Mount
    );
    assert_eq!(
        NamespaceKind::try_from(CLONE_NEWCGROUP).unwrap(),
        NamespaceKind::Cgroup
    );
    assert!(NamespaceKind::try_from(CLONE_SYSVSEM).is_err());
}

#[test]
fn test_error_display() {
    let err = Error::os("ns_get_parent", nix::errno::Errno::EPERM);
    assert_eq!(
        err.to_string(),
        "ns_get_parent failed: EPERM: Operation not permitted"
    );

    let err = Error::KindMismatch {
        expected: NamespaceKind::User,
        found: NamespaceKind::Mount,
    };
    assert_eq!(
        err.to_string(),
        "file descriptor references a mnt namespace, expected user"
    );
}

#[test]
fn test_process_id() {
    let pid = ProcessId::from_raw(1234);
    assert_eq!(pid.as_raw(), 1234);

    let current = ProcessId::current();
    assert!(current.as_raw() > 0);
}
