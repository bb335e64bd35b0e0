//! Path utilities for sesame applications.

use std::io;
use std::path::{Path, PathBuf};

/// Default base directory name.
pub const DEFAULT_BASE_DIR: &str = ".sesame";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Data directory name, next to the config file.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default fingerprint store filename.
pub const DEFAULT_STORE_FILE: &str = "fingerprint.redb";

/// Returns the default store path for a config directory
/// (`<dir>/data/fingerprint.redb`).
pub fn store_file_in(config_dir: &Path) -> PathBuf {
    config_dir.join(DEFAULT_DATA_DIR).join(DEFAULT_STORE_FILE)
}

/// Provides access to the sesame directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Application name.
    pub app_name: String,
    /// User's home directory.
    pub home_dir: PathBuf,
}

impl Paths {
    /// Creates a new Paths instance for the given app.
    pub fn new(app_name: impl Into<String>) -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self::with_home(app_name, home_dir))
    }

    /// Creates a Paths instance rooted at an explicit home directory.
    pub fn with_home(app_name: impl Into<String>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Returns the base sesame directory (~/.sesame).
    pub fn base_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_BASE_DIR)
    }

    /// Returns the app-specific directory (~/.sesame/<app>).
    pub fn app_dir(&self) -> PathBuf {
        self.base_dir().join(&self.app_name)
    }

    /// Returns the config file path (~/.sesame/<app>/config.yaml).
    pub fn config_file(&self) -> PathBuf {
        self.app_dir().join(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_structure() {
        let paths = Paths::with_home("testapp", "/home/someone");

        assert_eq!(paths.base_dir(), PathBuf::from("/home/someone/.sesame"));
        assert!(paths.app_dir().ends_with(".sesame/testapp"));
        assert!(paths.config_file().ends_with("testapp/config.yaml"));
        assert!(store_file_in(&paths.app_dir()).ends_with("testapp/data/fingerprint.redb"));
    }

    #[test]
    fn test_store_file_in() {
        assert_eq!(
            store_file_in(Path::new("/etc/sesame")),
            PathBuf::from("/etc/sesame/data/fingerprint.redb")
        );
    }
}
