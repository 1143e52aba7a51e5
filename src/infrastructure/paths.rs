//! Filesystem locations used by the CLI and the tracing setup.

use std::path::{Path, PathBuf};

/// Returns the per-user data directory for roster files.
///
/// This is `<data-local-dir>/roster` (e.g. `~/.local/share/roster` on Linux),
/// falling back to `./.roster` when the platform reports no data directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".roster"), |dir| dir.join("roster"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory is
/// known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use roster::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/log/roster.json"), PathBuf::from("/var/log/roster.json"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/fixtures.json"), home.join("fixtures.json"));
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };

    if path == Path::new("~") {
        home
    } else if let Ok(rest) = path.strip_prefix("~") {
        home.join(rest)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("relative/file.json"), PathBuf::from("relative/file.json"));
        assert_eq!(expand_tilde("/abs/~/file.json"), PathBuf::from("/abs/~/file.json"));
    }

    #[test]
    fn data_dir_ends_with_crate_name() {
        assert!(data_dir().ends_with("roster") || data_dir().ends_with(".roster"));
    }
}
