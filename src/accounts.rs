//! Account database access and display name resolution.
//!
//! Reports show people, not login names. A username resolves to the first
//! comma separated segment of its GECOS field; when that is missing or empty
//! the report shows `"<username> (real name not found)"` instead.
//!
//! Two databases are supported:
//!
//! - [`AccountDatabase::Live`] asks `getent passwd`, so NSS sources (LDAP,
//!   SSSD, ...) are honoured.
//! - [`AccountDatabase::File`] reads a passwd(5) formatted file, such as
//!   `/etc/passwd` or a saved `getent passwd` dump from another host.

use crate::error::AuditError;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// `getent` exit status for "key not found"
const GETENT_NOT_FOUND: i32 = 2;

/// One passwd(5) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub passwd: String,
    pub uid: String,
    pub gid: String,
    pub gecos: String,
    pub dir: String,
    pub shell: String,
}

impl PasswdEntry {
    /// Parse `name:passwd:uid:gid:gecos:dir:shell`
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        let mut fields = line.splitn(7, ':');
        let name = fields.next().filter(|n| !n.is_empty())?;
        let mut next = || fields.next().unwrap_or_default().to_string();

        Some(Self {
            name: name.to_string(),
            passwd: next(),
            uid: next(),
            gid: next(),
            gecos: next(),
            dir: next(),
            shell: next(),
        })
    }

    /// First GECOS segment, when non-empty
    pub fn real_name(&self) -> Option<&str> {
        self.gecos
            .split(',')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn parse_entries(contents: &str) -> Vec<PasswdEntry> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(PasswdEntry::parse)
        .collect()
}

/// Maps a username to a human display name
pub trait DisplayResolvable {
    /// The account's real name, if the database knows one
    fn resolve_name(&self, username: &str) -> Option<String>;

    /// Real name, or the `(real name not found)` placeholder
    fn display_name(&self, username: &str) -> String {
        self.resolve_name(username)
            .unwrap_or_else(|| fallback_name(username))
    }
}

/// Placeholder shown for accounts without a usable real name
pub fn fallback_name(username: &str) -> String {
    format!("{} (real name not found)", username)
}

/// Where account records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountDatabase {
    /// `getent passwd` on the local host
    Live,
    /// A passwd(5) formatted file
    File(PathBuf),
}

impl AccountDatabase {
    /// Look up one account. An unknown user is `Ok(None)`.
    pub fn lookup(&self, username: &str) -> Result<Option<PasswdEntry>, AuditError> {
        match self {
            Self::Live => {
                let output = run_getent(&["passwd", username])?;
                Ok(output.and_then(|stdout| parse_entries(&stdout).into_iter().next()))
            }
            Self::File(path) => Ok(read_passwd_file(path)?
                .into_iter()
                .find(|entry| entry.name == username)),
        }
    }

    /// Every account, in database order
    pub fn list_all(&self) -> Result<Vec<PasswdEntry>, AuditError> {
        match self {
            Self::Live => Ok(run_getent(&["passwd"])?
                .map(|stdout| parse_entries(&stdout))
                .unwrap_or_default()),
            Self::File(path) => read_passwd_file(path),
        }
    }
}

impl DisplayResolvable for AccountDatabase {
    fn resolve_name(&self, username: &str) -> Option<String> {
        match self.lookup(username) {
            Ok(entry) => entry.and_then(|e| e.real_name().map(str::to_string)),
            Err(err) => {
                warn!("[accounts] Lookup of {username} failed: {err}");
                None
            }
        }
    }
}

fn read_passwd_file(path: &Path) -> Result<Vec<PasswdEntry>, AuditError> {
    let contents = fs::read_to_string(path).map_err(|err| AuditError::io(path, err))?;
    Ok(parse_entries(&contents))
}

/// Run `getent`; `Ok(None)` when the key is unknown
fn run_getent(args: &[&str]) -> Result<Option<String>, AuditError> {
    debug!("[accounts] getent {}", args.join(" "));
    let output = Command::new("getent")
        .args(args)
        .output()
        .map_err(|err| AuditError::AccountLookup(format!("could not run getent: {err}")))?;

    match output.status.code() {
        Some(0) => Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned())),
        Some(GETENT_NOT_FOUND) => Ok(None),
        code => Err(AuditError::AccountLookup(format!(
            "getent {} exited with {:?}: {}",
            args.join(" "),
            code,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
    }
}

/// Usernames holding an authorized SSH key.
///
/// The key holder file is colon delimited with the username first:
/// `alice:ssh-rsa AAAA... alice@laptop`.
pub fn read_key_holders(path: impl AsRef<Path>) -> Result<HashSet<String>, AuditError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| AuditError::io(path, err))?;

    Ok(contents
        .lines()
        .filter_map(|line| line.split(':').next())
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(str::to_string)
        .collect())
}
