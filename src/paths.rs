//! Locations of config, logs and bundled models.
//!
//! Everything lives next to the executable unless `BOWLING_OCR_HOME` points
//! somewhere else.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const HOME_VAR: &str = "BOWLING_OCR_HOME";

static BASE_DIR: OnceLock<PathBuf> = OnceLock::new();

fn resolve_base_dir(home: Option<&Path>, exe: Option<&Path>) -> PathBuf {
    if let Some(home) = home.filter(|h| !h.as_os_str().is_empty()) {
        return home.to_path_buf();
    }
    exe.and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the base directory: `$BOWLING_OCR_HOME`, else the executable's directory.
pub fn get_exe_dir() -> &'static PathBuf {
    BASE_DIR.get_or_init(|| {
        let home = std::env::var_os(HOME_VAR).map(PathBuf::from);
        let exe = std::env::current_exe().ok();
        resolve_base_dir(home.as_deref(), exe.as_deref())
    })
}

/// Returns the logs directory: `<base>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the bundled OCR model directory: `<base>/models/`
pub fn get_models_dir() -> PathBuf {
    get_exe_dir().join("models")
}

/// Returns the default pipeline config path: `<base>/config.json`
pub fn get_config_path() -> PathBuf {
    get_exe_dir().join("config.json")
}

/// Returns the default chart config path: `<base>/chart_config.json`
pub fn get_chart_config_path() -> PathBuf {
    get_exe_dir().join("chart_config.json")
}

/// Creates the log directory. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())
}
