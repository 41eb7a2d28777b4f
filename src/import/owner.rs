//! Repository file ownership.

use super::{Error, Result};
use std::os::unix::fs::lchown;
use std::path::Path;
use walkdir::WalkDir;

/// Numeric owner applied to imported repository files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ownership {
    /// uid of the user owning repository files.
    pub uid: u32,

    /// gid of the group owning repository files.
    pub gid: u32,
}

impl Ownership {
    /// Resolve user and group names to numeric ids.
    ///
    /// Resolution goes through the local account databases, so a GitLab
    /// user that only exists in a remote directory (LDAP and the like)
    /// cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error if either name cannot be resolved.
    pub fn resolve(user: &str, group: &str) -> Result<Self> {
        let uid = uzers::get_user_by_name(user)
            .ok_or_else(|| Error::UnknownUser(user.to_owned()))?
            .uid();
        let gid = uzers::get_group_by_name(group)
            .ok_or_else(|| Error::UnknownGroup(group.to_owned()))?
            .gid();
        Ok(Self { uid, gid })
    }
}

/// Recursively set the owner of `path` and everything under it.
///
/// Symlinks are re-owned themselves rather than followed, so a link
/// pointing outside the repository cannot change ownership elsewhere.
///
/// # Errors
///
/// Returns an error if walking the tree or changing ownership fails.
pub fn chown_recursive(path: &Path, owner: Ownership) -> Result<()> {
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry?;
        lchown(entry.path(), Some(owner.uid), Some(owner.gid))?;
    }
    Ok(())
}
