use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where log files go; `TIMEBOXER_LOG_DIR` wins over the platform default.
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("TIMEBOXER_LOG_DIR") {
            return Some(PathBuf::from(dir));
        }
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("timeboxer"),
            )
        } else {
            ProjectDirs::from("", "", "timeboxer").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }
}
