//! Notification backend adapters with automatic selection
//!
//! The D-Bus adapter is preferred on Linux because it is the only one that
//! carries inline reply text; notify-rust covers the remaining platforms.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::application::ports::{BackendError, BackendEventSender, NotificationBackend};

#[cfg(target_os = "linux")]
mod dbus;
mod noop;
mod notify_rust;

#[cfg(target_os = "linux")]
pub use dbus::DbusBackend;
pub use noop::NoOpBackend;
pub use notify_rust::NotifyRustBackend;

/// Backends a notification can be routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Linux: org.freedesktop.Notifications over the session bus
    Dbus,
    /// Cross-platform notify-rust library
    NotifyRust,
    /// Accepts everything, displays nothing
    NoOp,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Dbus => write!(f, "dbus"),
            BackendKind::NotifyRust => write!(f, "notify-rust"),
            BackendKind::NoOp => write!(f, "none"),
        }
    }
}

/// User preference for backend selection.
///
/// - All platforms support `Auto`, `NotifyRust`, and `NoOp`.
/// - Linux additionally supports `Dbus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Pick the best backend for the platform (default)
    #[default]
    Auto,
    /// Use the session notification server directly (Linux only)
    #[cfg(target_os = "linux")]
    Dbus,
    /// Use the notify-rust library
    NotifyRust,
    /// Display nothing
    NoOp,
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPreference::Auto => write!(f, "auto"),
            #[cfg(target_os = "linux")]
            BackendPreference::Dbus => write!(f, "dbus"),
            BackendPreference::NotifyRust => write!(f, "notify-rust"),
            BackendPreference::NoOp => write!(f, "none"),
        }
    }
}

/// Valid values for the `backend` setting
#[cfg(target_os = "linux")]
pub const VALID_BACKENDS: &[&str] = &["auto", "dbus", "notify-rust", "none"];
#[cfg(not(target_os = "linux"))]
pub const VALID_BACKENDS: &[&str] = &["auto", "notify-rust", "none"];

/// Error type for parsing a backend preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBackendError {
    pub value: String,
    pub valid_options: &'static str,
}

impl fmt::Display for ParseBackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid backend '{}'. Valid options: {}",
            self.value, self.valid_options
        )
    }
}

impl std::error::Error for ParseBackendError {}

impl FromStr for BackendPreference {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(BackendPreference::Auto),
            #[cfg(target_os = "linux")]
            "dbus" => Ok(BackendPreference::Dbus),
            "notify-rust" => Ok(BackendPreference::NotifyRust),
            "none" | "noop" => Ok(BackendPreference::NoOp),
            _ => Err(ParseBackendError {
                value: s.to_string(),
                #[cfg(target_os = "linux")]
                valid_options: "auto, dbus, notify-rust, none",
                #[cfg(not(target_os = "linux"))]
                valid_options: "auto, notify-rust, none",
            }),
        }
    }
}

/// Create a backend using the specified preference.
///
/// Returns the backend and the kind actually selected. `Auto` prefers the
/// session bus on Linux and falls back to notify-rust when the bus is
/// unreachable.
pub async fn create_backend(
    preference: BackendPreference,
    app_name: &str,
    timeout_ms: i32,
    events: BackendEventSender,
) -> Result<(Arc<dyn NotificationBackend>, BackendKind), BackendError> {
    match preference {
        BackendPreference::Auto => {
            #[cfg(target_os = "linux")]
            {
                match DbusBackend::connect(app_name, timeout_ms, events.clone()).await {
                    Ok(backend) => {
                        return Ok((
                            Arc::new(backend) as Arc<dyn NotificationBackend>,
                            BackendKind::Dbus,
                        ))
                    }
                    Err(_) => {
                        // Bus unreachable; notify-rust may still find a way.
                    }
                }
            }
            Ok((
                Arc::new(NotifyRustBackend::new(app_name, timeout_ms, events))
                    as Arc<dyn NotificationBackend>,
                BackendKind::NotifyRust,
            ))
        }
        #[cfg(target_os = "linux")]
        BackendPreference::Dbus => {
            let backend = DbusBackend::connect(app_name, timeout_ms, events).await?;
            Ok((
                Arc::new(backend) as Arc<dyn NotificationBackend>,
                BackendKind::Dbus,
            ))
        }
        BackendPreference::NotifyRust => Ok((
            Arc::new(NotifyRustBackend::new(app_name, timeout_ms, events))
                as Arc<dyn NotificationBackend>,
            BackendKind::NotifyRust,
        )),
        BackendPreference::NoOp => {
            let _ = (app_name, timeout_ms, events);
            Ok((
                Arc::new(NoOpBackend::new()) as Arc<dyn NotificationBackend>,
                BackendKind::NoOp,
            ))
        }
    }
}
