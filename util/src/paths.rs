use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Public URL prefix under which stored avatars are served.
pub const AVATAR_URL_PREFIX: &str = "/api/avatars";

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Avatar storage root (absolute).
/// If relative, resolve against current_dir().
pub fn avatar_root(configured: &str) -> PathBuf {
    let p = PathBuf::from(configured);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Stored file name for an upload: `{student_id}_{unix_millis}.{ext}`.
///
/// Every upload gets a fresh name; older files are left in place.
pub fn avatar_filename(student_id: i64, unix_millis: i64, ext: &str) -> String {
    format!("{student_id}_{unix_millis}.{ext}")
}

/// Public URL recorded on the student row for a stored avatar.
pub fn avatar_url(filename: &str) -> String {
    format!("{AVATAR_URL_PREFIX}/{filename}")
}

/// Resolve a requested avatar file name inside the storage root.
///
/// Returns `None` for anything that is not a single plain path component,
/// so requests cannot escape the avatar directory.
pub fn avatar_path(root: &Path, filename: &str) -> Option<PathBuf> {
    let valid = !filename.is_empty()
        && !filename.starts_with('.')
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    valid.then(|| root.join(filename))
}
