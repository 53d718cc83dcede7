//! Notification backend port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{ActivationKind, CloseReason, NotificationRequest};

/// Backend errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Failed to connect to the notification service: {0}")]
    ConnectionFailed(String),

    #[error("Failed to submit notification: {0}")]
    SubmitFailed(String),

    #[error("Failed to cancel notification: {0}")]
    CancelFailed(String),

    #[error("Notification backend '{0}' is not available")]
    Unavailable(String),
}

/// Opaque OS handle for one submitted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub u32);

/// Event a backend pushes onto the center's queue when the OS reports
/// something about a submitted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The user activated the notification.
    Activated { ticket: Ticket, kind: ActivationKind },
    /// The OS closed the notification.
    Closed { ticket: Ticket, reason: CloseReason },
}

/// Sender half of the backend event queue. Handed to each adapter at
/// construction; the center drains the receiving half on one task.
pub type BackendEventSender = tokio::sync::mpsc::UnboundedSender<BackendEvent>;

/// Port for the OS notification service
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Submit a notification for display.
    ///
    /// # Returns
    /// The OS ticket identifying the displayed notification.
    async fn submit(&self, request: &NotificationRequest) -> Result<Ticket, BackendError>;

    /// Ask the OS to remove a pending or displayed notification.
    ///
    /// Has no effect on an activation the OS has already queued.
    async fn cancel(&self, ticket: Ticket) -> Result<(), BackendError>;
}

/// Blanket implementation for boxed backend types
#[async_trait]
impl NotificationBackend for Box<dyn NotificationBackend> {
    async fn submit(&self, request: &NotificationRequest) -> Result<Ticket, BackendError> {
        self.as_ref().submit(request).await
    }

    async fn cancel(&self, ticket: Ticket) -> Result<(), BackendError> {
        self.as_ref().cancel(ticket).await
    }
}
