//! Path utilities for the Zellij sandbox environment.

use std::path::PathBuf;

/// File name of the key-value document inside [`get_data_dir`].
pub const STATE_FILE: &str = "state.json";

/// Returns the data directory for Taskboard storage and traces.
///
/// In Zellij's plugin environment `/host` points to the cwd of the last
/// focused terminal, or the folder where Zellij was started. When that is the
/// home directory this resolves to `~/.local/share/zellij/taskboard`.
///
/// # Examples
///
/// ```
/// use taskboard::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/taskboard");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("taskboard")
}

/// Expands tilde paths to use the `/host` prefix for the Zellij sandbox.
///
/// # Examples
///
/// ```
/// use taskboard::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/nord.toml"), "/host/themes/nord.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
