//! Locating the `billing.yaml` file.
//!
//! The `BILLING_CONFIG` environment variable wins; otherwise the directory
//! tree is walked upwards from a starting directory.

use std::path::{Path, PathBuf};

/// File name looked for in each directory.
pub const CONFIG_FILE_NAME: &str = "billing.yaml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BILLING_CONFIG";

/// Walk up the directory tree from `start` looking for `billing.yaml`.
///
/// Returns `None` when the filesystem root is reached without a match. A
/// `BILLING_CONFIG` pointing at an existing file takes priority.
///
/// # Examples
///
/// ```no_run
/// use billing_config::find_config_file;
/// use std::path::Path;
///
/// if let Some(path) = find_config_file(Path::new(".")) {
///     println!("using {}", path.display());
/// }
/// ```
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let env_path = PathBuf::from(env_path);
        if env_path.is_file() {
            return Some(env_path);
        }
    }
    find_config_file_from(start)
}

fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_file_in_start_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = find_config_file_from(dir.path()).unwrap();
        assert_eq!(found, dir.path().canonicalize().unwrap().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn finds_file_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let child = dir.path().join("a").join("b");
        std::fs::create_dir_all(&child).unwrap();

        let found = find_config_file_from(&child).unwrap();
        assert!(found.ends_with(CONFIG_FILE_NAME));
        assert_eq!(found.parent().unwrap(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn directory_with_the_config_name_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let found = find_config_file_from(dir.path());
        assert!(found.is_none_or(|p| p.parent() != Some(dir.path())));
    }

    #[test]
    fn missing_start_dir() {
        assert!(find_config_file_from(Path::new("/nonexistent/billing/dir")).is_none());
    }
}
