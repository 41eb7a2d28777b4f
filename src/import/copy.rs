//! Copy a repository tree with entry filtering.

use super::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Which source entries to leave out of the copy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CopyFilter {
    /// Skip symlinks whose target does not exist.
    pub ignore_broken_links: bool,

    /// Skip everything under `refs/remotes`.
    ///
    /// Gitolite and mirror setups leave remote-tracking refs in bare repos;
    /// GitLab has no use for them.
    pub ignore_refs_remotes: bool,
}

/// Recursively copy `source` to `dest`, applying `filter`.
///
/// Directories are created with their default permissions; regular files
/// keep the source permissions, so hook scripts stay executable. Valid
/// symlinks are followed and copied as the files they point to.
///
/// # Errors
///
/// Returns an error if the walk fails or an entry cannot be copied. A
/// broken symlink is an error unless `filter.ignore_broken_links` is set.
/// The partially written destination is left in place; cleanup is the
/// caller's policy.
///
/// # Panics
///
/// Panics if the walk yields a path outside of `source`, which would mean a
/// bug in [`walkdir`].
pub fn copy_filtered(
    source: &Path,
    dest: &Path,
    filter: CopyFilter,
    log: &slog::Logger,
) -> Result<()> {
    let refs_remotes = source.join("refs").join("remotes");

    let mut walker = WalkDir::new(source).follow_links(false).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        let path = entry.path();

        if filter.ignore_refs_remotes && path.starts_with(&refs_remotes) {
            slog::warn!(log, "Skipping refs/remotes path: {path:?}");
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        if filter.ignore_broken_links
            && entry.path_is_symlink()
            && !path.exists()
        {
            slog::warn!(log, "Skipping broken link: {path:?}");
            continue;
        }

        #[expect(clippy::match_wild_err_arm, reason = "better panic message")]
        let relative = match path.strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => panic!(
                "{path:?} found under {source:?}, but does not have it as a \
                prefix",
            ),
        };

        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            // FIXME: a symlink that points to a directory fails here.
            fs::copy(path, &target)?;
        }
    }

    Ok(())
}
