//! Activation registry: pending host callbacks keyed by notification id

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::notification::{ActivationEvent, ActivationKind};

/// Host callback invoked with `(is_reply, response)` when a notification
/// is activated.
pub type ActivationCallback = Box<dyn FnOnce(bool, String) + Send + 'static>;

struct Registration {
    callback: ActivationCallback,
    can_reply: bool,
}

/// Mapping from notification identifier to its pending host callback.
///
/// One entry is created per notification construction when a callback is
/// supplied, and consumed once the corresponding activation fires. Entries
/// for notifications that are never activated stay behind; the registry is
/// small and process-lifetime only, so this is tolerated.
///
/// All mutation happens either synchronously during notification
/// construction or on the center's single dispatcher task, so the lock is
/// never contended for long.
#[derive(Default)]
pub struct ActivationRegistry {
    entries: Mutex<HashMap<String, Registration>>,
}

impl ActivationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `id`, replacing any previous entry.
    ///
    /// Collision policy: the last registration for a given identifier wins.
    /// Identifier uniqueness across pending notifications is the caller's
    /// responsibility.
    pub fn register(&self, id: impl Into<String>, can_reply: bool, callback: ActivationCallback) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(id.into(), Registration { callback, can_reply });
    }

    /// Whether a pending callback exists for `id`
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().unwrap().contains_key(id)
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Consume the entry for the event's identifier and invoke its callback.
    ///
    /// The callback receives `is_reply = true` only when the OS reported a
    /// reply activation *and* the registration asked for reply capability;
    /// the response text is empty otherwise.
    ///
    /// # Returns
    /// `true` if a callback was dispatched; `false` for unknown identifiers
    /// (foreign or already-consumed notifications), which are not an error.
    pub fn dispatch(&self, event: ActivationEvent) -> bool {
        let registration = {
            let mut entries = self.entries.lock().unwrap();
            entries.remove(&event.identifier)
        };

        let Some(registration) = registration else {
            return false;
        };

        let (is_reply, response) = match event.kind {
            ActivationKind::Replied(text) if registration.can_reply => (true, text),
            _ => (false, String::new()),
        };

        (registration.callback)(is_reply, response);
        true
    }
}
