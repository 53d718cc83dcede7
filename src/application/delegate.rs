//! OS event sink delegates

use std::sync::Arc;

use crate::domain::notification::{ActivationEvent, NotificationRequest};

use super::registry::ActivationRegistry;

/// Event sink for OS-originated notification events.
///
/// `should_present` is consulted before a notification is handed to the OS;
/// `did_activate` receives each user activation exactly once, on the
/// center's dispatcher task.
pub trait NotificationDelegate: Send + Sync {
    /// Whether the notification should be shown even if the application
    /// is currently in the foreground.
    fn should_present(&self, request: &NotificationRequest) -> bool;

    /// Handle one user activation.
    fn did_activate(&self, event: ActivationEvent);
}

/// Delegate that routes activations to registered host callbacks.
pub struct ActivationDelegate {
    registry: Arc<ActivationRegistry>,
}

impl ActivationDelegate {
    pub fn new(registry: Arc<ActivationRegistry>) -> Self {
        Self { registry }
    }
}

impl NotificationDelegate for ActivationDelegate {
    fn should_present(&self, _request: &NotificationRequest) -> bool {
        // The OS default is to suppress notifications from a foregrounded
        // application; presenting unconditionally is the reason a custom
        // delegate exists at all.
        true
    }

    fn did_activate(&self, event: ActivationEvent) {
        // Unknown identifiers are expected in normal operation (foreign or
        // stale notifications) and ignored.
        let _ = self.registry.dispatch(event);
    }
}

/// Presentation-only delegate: keeps notifications visible while the
/// application is foregrounded but performs no callback dispatch.
pub struct PresentationDelegate;

impl NotificationDelegate for PresentationDelegate {
    fn should_present(&self, _request: &NotificationRequest) -> bool {
        true
    }

    fn did_activate(&self, _event: ActivationEvent) {}
}
