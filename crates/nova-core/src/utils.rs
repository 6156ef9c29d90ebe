//! Utility helpers: data paths and string trimming.

use std::path::PathBuf;

/// Get the Nova data directory (e.g. `~/.nova/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".nova")
}

/// Default location of the key-value state file (`~/.nova/state.json`).
pub fn get_state_path() -> PathBuf {
    get_data_path().join("state.json")
}

/// Default location of the saved chats file (`~/.nova/chats.json`).
pub fn get_chats_path() -> PathBuf {
    get_data_path().join("chats.json")
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
