//! Linux backend speaking org.freedesktop.Notifications over D-Bus
//!
//! This is the only path that carries inline reply text: servers
//! implementing the KDE reply extension emit `NotificationReplied` with the
//! typed text alongside the standard `ActionInvoked` and
//! `NotificationClosed` signals.

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use zbus::zvariant::Value;
use zbus::Connection;

use crate::application::ports::{
    BackendError, BackendEvent, BackendEventSender, NotificationBackend, Ticket,
};
use crate::domain::notification::{
    bundle_id, ActivationKind, CloseReason, NotificationRequest,
};

/// Action key for the default (body click) activation
const ACTION_DEFAULT: &str = "default";

/// Action key reserved by the KDE inline-reply extension
const ACTION_INLINE_REPLY: &str = "inline-reply";

/// Server capability advertising the inline-reply extension
const CAPABILITY_INLINE_REPLY: &str = "inline-reply";

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    fn close_notification(&self, id: u32) -> zbus::Result<()>;

    fn get_capabilities(&self) -> zbus::Result<Vec<String>>;

    #[zbus(signal)]
    fn action_invoked(&self, id: u32, action_key: String) -> zbus::Result<()>;

    #[zbus(signal)]
    fn notification_closed(&self, id: u32, reason: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn notification_replied(&self, id: u32, text: String) -> zbus::Result<()>;
}

/// Map an invoked action key to an activation.
///
/// A bare `inline-reply` invocation (no reply signal) means the server
/// accepted a reply but does not forward its text.
fn map_action(action_key: &str) -> ActivationKind {
    if action_key == ACTION_INLINE_REPLY {
        ActivationKind::Replied(String::new())
    } else {
        ActivationKind::Clicked
    }
}

/// Action list for the wire: flat `[key, label, ...]` pairs.
fn build_actions(reply_capable: bool) -> Vec<&'static str> {
    let mut actions = vec![ACTION_DEFAULT, "Activate"];
    if reply_capable {
        actions.push(ACTION_INLINE_REPLY);
        actions.push("Reply");
    }
    actions
}

/// Backend for the session notification server.
pub struct DbusBackend {
    proxy: NotificationsProxy<'static>,
    app_name: String,
    timeout_ms: i32,
    supports_inline_reply: bool,
}

impl DbusBackend {
    /// Connect to the session bus and start listening for notification
    /// signals. Each signal stream runs on its own task and forwards onto
    /// `events`; the tasks end when the connection drops.
    pub async fn connect(
        app_name: impl Into<String>,
        timeout_ms: i32,
        events: BackendEventSender,
    ) -> Result<Self, BackendError> {
        let connection = Connection::session()
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;
        let proxy = NotificationsProxy::new(&connection)
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let supports_inline_reply = proxy
            .get_capabilities()
            .await
            .map(|caps| caps.iter().any(|c| c == CAPABILITY_INLINE_REPLY))
            .unwrap_or(false);

        let mut actions = proxy
            .receive_action_invoked()
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;
        let mut closed = proxy
            .receive_notification_closed()
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;
        let mut replies = proxy
            .receive_notification_replied()
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let sender = events.clone();
        tokio::spawn(async move {
            while let Some(signal) = actions.next().await {
                let Ok(args) = signal.args() else { continue };
                let event = BackendEvent::Activated {
                    ticket: Ticket(*args.id()),
                    kind: map_action(args.action_key()),
                };
                if sender.send(event).is_err() {
                    break;
                }
            }
        });

        let sender = events.clone();
        tokio::spawn(async move {
            while let Some(signal) = closed.next().await {
                let Ok(args) = signal.args() else { continue };
                let event = BackendEvent::Closed {
                    ticket: Ticket(*args.id()),
                    reason: CloseReason::from_code(*args.reason()),
                };
                if sender.send(event).is_err() {
                    break;
                }
            }
        });

        let sender = events;
        tokio::spawn(async move {
            while let Some(signal) = replies.next().await {
                let Ok(args) = signal.args() else { continue };
                let event = BackendEvent::Activated {
                    ticket: Ticket(*args.id()),
                    kind: ActivationKind::Replied(args.text().clone()),
                };
                if sender.send(event).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            proxy,
            app_name: app_name.into(),
            timeout_ms,
            supports_inline_reply,
        })
    }

    /// Whether the server advertises the inline-reply capability
    pub fn supports_inline_reply(&self) -> bool {
        self.supports_inline_reply
    }
}

#[async_trait]
impl NotificationBackend for DbusBackend {
    async fn submit(&self, request: &NotificationRequest) -> Result<Ticket, BackendError> {
        let reply_capable = request.can_reply() && self.supports_inline_reply;
        let actions = build_actions(reply_capable);

        let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
        hints.insert("desktop-entry", Value::from(bundle_id()));
        if !request.sound_name().is_empty() {
            hints.insert("sound-name", Value::from(request.sound_name()));
        }
        if reply_capable {
            hints.insert("x-kde-reply-placeholder-text", Value::from("Reply"));
        }

        let id = self
            .proxy
            .notify(
                &self.app_name,
                0,
                request.icon(),
                request.title(),
                request.body(),
                &actions,
                hints,
                self.timeout_ms,
            )
            .await
            .map_err(|e| BackendError::SubmitFailed(e.to_string()))?;

        Ok(Ticket(id))
    }

    async fn cancel(&self, ticket: Ticket) -> Result<(), BackendError> {
        self.proxy
            .close_notification(ticket.0)
            .await
            .map_err(|e| BackendError::CancelFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_action_maps_to_click() {
        assert_eq!(map_action("default"), ActivationKind::Clicked);
    }

    #[test]
    fn unknown_action_maps_to_click() {
        assert_eq!(map_action("custom-button"), ActivationKind::Clicked);
    }

    #[test]
    fn bare_inline_reply_action_maps_to_empty_reply() {
        assert_eq!(
            map_action("inline-reply"),
            ActivationKind::Replied(String::new())
        );
    }

    #[test]
    fn actions_always_include_default() {
        assert_eq!(build_actions(false), vec!["default", "Activate"]);
    }

    #[test]
    fn reply_capable_actions_add_inline_reply() {
        assert_eq!(
            build_actions(true),
            vec!["default", "Activate", "inline-reply", "Reply"]
        );
    }
}
