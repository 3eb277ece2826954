//! Where fileprog keeps its files
//!
//! - `<data dir>/config.json`: progress display configuration
//! - `<state dir>/fileprog.log`: log output of the command-line tool
//!
//! Both directories come from the XDG base directories (`~/.local/share/fileprog`
//! and `~/.local/state/fileprog` on Linux).

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "fileprog.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "fileprog", "fileprog")
}

pub fn get_data_dir() -> Option<PathBuf> {
    project_dirs().map(|pd| pd.data_dir().to_path_buf())
}

/// State directory; `None` on platforms without one (macOS, Windows).
pub fn get_state_dir() -> Option<PathBuf> {
    project_dirs().and_then(|pd| pd.state_dir().map(Path::to_path_buf))
}

/// Default configuration file location
pub fn config_file() -> Option<PathBuf> {
    get_data_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Log file location, falling back to the data directory where there is no
/// state directory.
pub fn log_file() -> Option<PathBuf> {
    get_state_dir()
        .or_else(get_data_dir)
        .map(|dir| dir.join(LOG_FILE))
}

/// Creates the data and state directories, readable by the owner only.
pub fn ensure_dirs() -> std::io::Result<()> {
    for dir in [get_data_dir(), get_state_dir()].into_iter().flatten() {
        create_private_dir(&dir)?;
    }
    Ok(())
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .mode(0o700)
            .recursive(true)
            .create(dir)
    }

    #[cfg(not(unix))]
    {
        std::fs::create_dir_all(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_locations_use_fixed_names() {
        if let Some(path) = config_file() {
            assert_eq!(path.file_name().unwrap(), CONFIG_FILE);
        }
        if let Some(path) = log_file() {
            assert_eq!(path.file_name().unwrap(), LOG_FILE);
        }
    }

    #[test]
    fn test_private_dir_is_created_recursively() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        create_private_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directories are fine
        create_private_dir(&nested).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&nested).unwrap().permissions().mode();
            assert_eq!(mode & 0o077, 0);
        }
    }
}
