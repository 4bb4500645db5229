// Mount point resolution for disk usage lookups.

use std::path::Path;

/// Index of the deepest mount point that contains `path`, if any.
pub fn mount_for_path(path: &Path, mounts: &[&Path]) -> Option<usize> {
    mounts
        .iter()
        .enumerate()
        .filter(|(_, mount)| path.starts_with(mount))
        .max_by_key(|(_, mount)| mount.components().count())
        .map(|(i, _)| i)
}
