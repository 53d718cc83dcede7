//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name reported to the notification server.
    pub app_name: Option<String>,
    /// Backend preference: auto, dbus (Linux), notify-rust, or none.
    pub backend: Option<String>,
    /// Sound played for notifications that do not set one themselves.
    pub default_sound: Option<String>,
    /// Expiry timeout in milliseconds (-1 = server default, 0 = never).
    pub timeout_ms: Option<i32>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            app_name: Some("desk-notify".to_string()),
            backend: Some("auto".to_string()),
            default_sound: None,
            timeout_ms: Some(-1),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            app_name: other.app_name.or(self.app_name),
            backend: other.backend.or(self.backend),
            default_sound: other.default_sound.or(self.default_sound),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
        }
    }

    /// Get the app name, or "desk-notify" if not set
    pub fn app_name_or_default(&self) -> &str {
        self.app_name.as_deref().unwrap_or("desk-notify")
    }

    /// Get the backend preference string, or "auto" if not set
    pub fn backend_or_default(&self) -> &str {
        self.backend.as_deref().unwrap_or("auto")
    }

    /// Get the expiry timeout, or -1 (server default) if not set
    pub fn timeout_ms_or_default(&self) -> i32 {
        self.timeout_ms.unwrap_or(-1)
    }
}
