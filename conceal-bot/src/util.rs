//! Small shared helpers: identifiers, timestamps and well-known paths.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the per-user configuration directory.
const APP_DIR: &str = ".conceal-bot";

/// Current Unix time in milliseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // u64 milliseconds last until the year 584942417
pub fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Generate a unique message identifier.
#[must_use]
pub fn generate_message_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// The user's home directory, falling back to the working directory.
#[must_use]
pub fn home_dir() -> PathBuf {
    dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory (`~/.conceal-bot`).
#[must_use]
pub fn config_dir() -> PathBuf {
    home_dir().join(APP_DIR)
}

/// Default configuration file path (`~/.conceal-bot/config.json`).
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Default directory for persisted sessions.
#[must_use]
pub fn sessions_dir() -> PathBuf {
    config_dir().join("sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_uniqueness() {
        let a = generate_message_id();
        let b = generate_message_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_paths() {
        assert!(config_path().ends_with(".conceal-bot/config.json"));
        assert!(sessions_dir().starts_with(config_dir()));
        assert!(timestamp_ms() > 0);
    }
}
