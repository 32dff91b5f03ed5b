use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "touchtype";

/// Overrides the data directory; used by tests and portable installs
pub const DATA_DIR_ENV: &str = "TOUCHTYPE_DATA_DIR";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the JSON blobs and the log file live
    pub fn data_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir).join("config.json");
        }
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("touchtype_config.json"),
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::data_dir().map(|dir| dir.join("touchtype.log"))
    }
}
