//! Notification request value object

use std::env;
use std::sync::OnceLock;

/// Construction options for a notification.
///
/// Every field is optional; an absent field resolves to an empty string
/// (or `false` for the reply flag). Construction never fails.
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    /// Application-chosen identifier, used to correlate the activation
    /// back to its originating request.
    pub id: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Display body text.
    pub body: Option<String>,
    /// Icon name or path.
    pub icon: Option<String>,
    /// Name of a system sound to play on display.
    pub sound: Option<String>,
    /// Whether the notification offers an inline-reply field.
    pub has_reply: bool,
}

/// Immutable notification request.
///
/// Holds the fields needed to display one notification. All fields are
/// owned copies taken at construction, independent of caller-side storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    id: String,
    title: String,
    body: String,
    icon: String,
    sound_name: String,
    can_reply: bool,
}

impl NotificationRequest {
    /// Build a request from a construction bag, filling in defaults.
    pub fn from_options(options: NotificationOptions) -> Self {
        Self {
            id: options.id.unwrap_or_default(),
            title: options.title.unwrap_or_default(),
            body: options.body.unwrap_or_default(),
            icon: options.icon.unwrap_or_default(),
            sound_name: options.sound.unwrap_or_default(),
            can_reply: options.has_reply,
        }
    }

    /// Application-chosen identifier. Uniqueness is the caller's
    /// responsibility; this layer does not enforce it.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn sound_name(&self) -> &str {
        &self.sound_name
    }

    /// Whether the notification offers an inline-reply affordance.
    pub fn can_reply(&self) -> bool {
        self.can_reply
    }

    /// Identifier of the hosting application. Process-wide and read-only,
    /// independent of any single request.
    pub fn bundle_id(&self) -> &'static str {
        bundle_id()
    }
}

/// Process-wide application identifier, derived once from the running
/// executable's file name.
pub fn bundle_id() -> &'static str {
    static BUNDLE_ID: OnceLock<String> = OnceLock::new();
    BUNDLE_ID.get_or_init(|| {
        env::current_exe()
            .ok()
            .and_then(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "desk-notify".to_string())
    })
}
