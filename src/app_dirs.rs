use directories::ProjectDirs;
use std::path::PathBuf;

pub const LOG_DIR_ENV: &str = "READTIME_LOG_DIR";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn settings_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "readtime") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("readtime_settings.json")
        }
    }

    /// Per-process log file under `$READTIME_LOG_DIR`, if set
    pub fn log_path() -> Option<PathBuf> {
        let dir = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from)?;
        Some(dir.join(format!("readtime.{}.log", std::process::id())))
    }
}
