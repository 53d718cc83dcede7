//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// desk-notify - desktop notifications with activation callbacks
#[derive(Parser, Debug)]
#[command(name = "desk-notify")]
#[command(version)]
#[command(about = "Send desktop notifications and capture click or reply activations")]
#[command(long_about = None)]
pub struct Cli {
    /// Notification identifier (used to correlate activations)
    #[arg(short = 'i', long, value_name = "ID")]
    pub id: Option<String>,

    /// Notification title
    #[arg(short = 't', long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Notification body text
    #[arg(short = 'b', long, value_name = "TEXT")]
    pub body: Option<String>,

    /// Icon name or path
    #[arg(long, value_name = "ICON")]
    pub icon: Option<String>,

    /// Sound to play on display
    #[arg(short = 's', long, value_name = "SOUND")]
    pub sound: Option<String>,

    /// Request an inline reply field
    #[arg(short = 'r', long)]
    pub reply: bool,

    /// Wait for the notification to be activated and print the result
    #[arg(short = 'w', long)]
    pub wait: bool,

    /// Give up waiting after this many seconds
    #[arg(long, value_name = "SECS", requires = "wait")]
    pub wait_timeout: Option<u64>,

    /// Backend to use (auto, dbus, notify-rust, none)
    #[arg(long, value_name = "BACKEND", env = "DESK_NOTIFY_BACKEND")]
    pub backend: Option<String>,

    /// Application name reported to the notification server
    #[arg(long, value_name = "NAME")]
    pub app_name: Option<String>,

    /// Expiry timeout in milliseconds (-1 = server default, 0 = never)
    #[arg(long, value_name = "MS", allow_hyphen_values = true)]
    pub timeout: Option<i32>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed send options
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub sound: Option<String>,
    pub reply: bool,
    pub wait: bool,
    pub wait_timeout: Option<u64>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["app_name", "backend", "default_sound", "timeout_ms"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
