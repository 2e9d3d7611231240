use access_audit::accounts::AccountDatabase;
use access_audit::audit::snapshot::{append_row, SnapshotLog, SnapshotRow};
use access_audit::commands::log_access::{accounts_with_keys, log_could_access};
use access_audit::config::AuditConfig;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
alice:x:1000:1000:Alice Smith:/home/alice:/bin/bash
bob:x:1001:1001:Bob Jones:/home/bob:/bin/bash
carol:x:1002:1002:Carol White:/home/carol:/bin/bash
";

const KEYS: &str = "\
bob:ssh-rsa AAAAB3Nza bob@laptop
alice:ssh-ed25519 AAAAC3Nza alice@desk
alice:ssh-rsa AAAAB3Nzb alice@phone
dave:ssh-rsa AAAAB3Nzc dave@gone
";

fn setup() -> (TempDir, AuditConfig) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("passwd"), PASSWD).unwrap();
    fs::write(dir.path().join("keys"), KEYS).unwrap();

    let config = AuditConfig {
        wtmp_prefix: dir.path().join("wtmp"),
        snapshot_log: dir.path().join("could.log"),
        keys_file: dir.path().join("keys"),
        accounts: AccountDatabase::File(dir.path().join("passwd")),
    };
    (dir, config)
}

#[test]
fn test_log_records_accounts_with_keys() {
    let (_dir, config) = setup();

    let row = log_could_access(&config).unwrap();
    // Database order; dave has a key but no account
    assert_eq!(row.users, vec!["alice", "bob"]);

    let log = SnapshotLog::new(fs::read(&config.snapshot_log).unwrap());
    let rows: Vec<_> = log.rows().collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].users, vec!["alice", "bob"]);
    assert_eq!(rows[0].human_timestamp, row.human_timestamp);
}

#[test]
fn test_log_appends_rows() {
    let (_dir, config) = setup();

    log_could_access(&config).unwrap();
    log_could_access(&config).unwrap();

    let contents = fs::read_to_string(&config.snapshot_log).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_log_missing_keys_file() {
    let (dir, mut config) = setup();
    config.keys_file = dir.path().join("no-such-keys");

    assert!(log_could_access(&config).is_err());
    assert!(!config.snapshot_log.exists());
}

#[test]
fn test_accounts_with_keys_deduplicates() {
    let (dir, _config) = setup();
    fs::write(
        dir.path().join("passwd"),
        format!("{PASSWD}alice:x:1000:1000:Alice Again:/home/alice:/bin/zsh\n"),
    )
    .unwrap();

    let holders: HashSet<String> = ["alice", "carol"].iter().map(|s| s.to_string()).collect();
    let users = accounts_with_keys(&AccountDatabase::File(dir.path().join("passwd")), &holders)
        .unwrap();
    assert_eq!(users, vec!["alice", "carol"]);
}

#[test]
fn test_concurrent_appends_keep_rows_intact() {
    const WRITERS: usize = 8;
    const ROWS_PER_WRITER: usize = 50;

    let dir = TempDir::new().unwrap();
    let path = Arc::new(dir.path().join("could.log"));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = Arc::clone(&path);
            thread::spawn(move || {
                let users: Vec<String> = (0..20).map(|i| format!("user{writer}_{i}")).collect();
                for _ in 0..ROWS_PER_WRITER {
                    append_row(path.as_path(), &SnapshotRow::now(users.clone())).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let log = SnapshotLog::new(fs::read(path.as_path()).unwrap());
    let rows: Vec<_> = log.rows().collect();
    assert_eq!(rows.len(), WRITERS * ROWS_PER_WRITER);

    for row in rows {
        assert_eq!(row.users.len(), 20);
        let prefix = row.users[0].split('_').next().unwrap().to_string();
        assert!(row
            .users
            .iter()
            .all(|user| user.starts_with(&format!("{prefix}_"))));
    }
}
