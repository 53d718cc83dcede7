//! Cross-platform backend using notify-rust
//!
//! Works on Windows, macOS, and Linux. Inline reply text is not exposed by
//! notify-rust, so reply activations arrive without their text on this
//! path; the D-Bus backend carries it in full.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use notify_rust::Timeout;
use tokio::sync::oneshot;

use crate::application::ports::{
    BackendError, BackendEventSender, NotificationBackend, Ticket,
};
use crate::domain::notification::NotificationRequest;

#[cfg(all(unix, not(target_os = "macos")))]
use crate::application::ports::BackendEvent;
#[cfg(all(unix, not(target_os = "macos")))]
use crate::domain::notification::{ActivationKind, CloseReason};

/// Action key for the default (body click) activation
#[cfg(all(unix, not(target_os = "macos")))]
const ACTION_DEFAULT: &str = "default";

/// Cross-platform backend using notify-rust
pub struct NotifyRustBackend {
    app_name: String,
    timeout_ms: i32,
    events: BackendEventSender,
    /// Fallback ticket source for platforms where the library exposes no
    /// server-assigned id
    next_ticket: AtomicU32,
}

impl NotifyRustBackend {
    pub fn new(app_name: impl Into<String>, timeout_ms: i32, events: BackendEventSender) -> Self {
        Self {
            app_name: app_name.into(),
            timeout_ms,
            events,
            next_ticket: AtomicU32::new(1),
        }
    }
}

/// Map a `wait_for_action` callback into a backend event. notify-rust
/// reports every close through the single `__closed` sentinel and does not
/// say why, so the reason stays undefined; anything else is a named action,
/// which on this path means a click.
#[cfg(all(unix, not(target_os = "macos")))]
fn map_wait_action(ticket: Ticket, action: &str) -> BackendEvent {
    match action {
        "__closed" => BackendEvent::Closed {
            ticket,
            reason: CloseReason::Undefined,
        },
        _ => BackendEvent::Activated {
            ticket,
            kind: ActivationKind::Clicked,
        },
    }
}

/// Map the expiry policy to a notify-rust timeout: negative means the
/// server default, zero means never expire.
fn compute_timeout(timeout_ms: i32) -> Timeout {
    if timeout_ms < 0 {
        Timeout::Default
    } else if timeout_ms == 0 {
        Timeout::Never
    } else {
        Timeout::Milliseconds(timeout_ms as u32)
    }
}

#[async_trait]
impl NotificationBackend for NotifyRustBackend {
    async fn submit(&self, request: &NotificationRequest) -> Result<Ticket, BackendError> {
        let app_name = self.app_name.clone();
        let timeout = compute_timeout(self.timeout_ms);
        let title = request.title().to_owned();
        let body = request.body().to_owned();
        let icon = request.icon().to_owned();
        let sound = request.sound_name().to_owned();
        let events = self.events.clone();
        let fallback_ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::SeqCst));

        let (ticket_tx, ticket_rx) = oneshot::channel::<Result<Ticket, BackendError>>();

        // show() and wait_for_action() both block, so the whole interaction
        // lives on a blocking thread. The ticket is reported back as soon as
        // the notification is displayed; the thread then stays parked until
        // the notification is activated or closed.
        tokio::task::spawn_blocking(move || {
            let mut builder = notify_rust::Notification::new();
            builder
                .appname(&app_name)
                .summary(&title)
                .body(&body)
                .timeout(timeout);

            if !icon.is_empty() {
                builder.icon(&icon);
            }
            if !sound.is_empty() {
                builder.sound_name(&sound);
            }

            #[cfg(all(unix, not(target_os = "macos")))]
            builder.action(ACTION_DEFAULT, "Activate");

            let handle = match builder.show() {
                Ok(handle) => handle,
                Err(e) => {
                    let _ = ticket_tx.send(Err(BackendError::SubmitFailed(e.to_string())));
                    return;
                }
            };

            #[cfg(all(unix, not(target_os = "macos")))]
            {
                let _ = fallback_ticket;
                let ticket = Ticket(handle.id());
                let _ = ticket_tx.send(Ok(ticket));

                handle.wait_for_action(move |action| {
                    let _ = events.send(map_wait_action(ticket, action));
                });
            }

            #[cfg(not(all(unix, not(target_os = "macos"))))]
            {
                // No server-assigned id and no action stream on this
                // platform; the notification is fire-and-forget.
                let _ = handle;
                let _ = events;
                let _ = ticket_tx.send(Ok(fallback_ticket));
            }
        });

        ticket_rx
            .await
            .map_err(|e| BackendError::SubmitFailed(format!("Task join error: {}", e)))?
    }

    async fn cancel(&self, _ticket: Ticket) -> Result<(), BackendError> {
        // notify-rust gives no close-by-id; the handle that could close the
        // notification is parked inside wait_for_action. The notification
        // is left to expire on its own.
        Ok(())
    }
}
