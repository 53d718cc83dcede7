//! No-op backend for headless environments and tests

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::application::ports::{BackendError, NotificationBackend, Ticket};
use crate::domain::notification::NotificationRequest;

/// Backend that accepts every submission without contacting any
/// notification service. Tickets are issued sequentially so correlation
/// logic stays exercised; no events are ever emitted.
pub struct NoOpBackend {
    next_ticket: AtomicU32,
}

impl NoOpBackend {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU32::new(1),
        }
    }
}

impl Default for NoOpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationBackend for NoOpBackend {
    async fn submit(&self, _request: &NotificationRequest) -> Result<Ticket, BackendError> {
        Ok(Ticket(self.next_ticket.fetch_add(1, Ordering::SeqCst)))
    }

    async fn cancel(&self, _ticket: Ticket) -> Result<(), BackendError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationOptions;

    #[tokio::test]
    async fn issues_sequential_tickets() {
        let backend = NoOpBackend::new();
        let request = NotificationRequest::from_options(NotificationOptions::default());

        let first = backend.submit(&request).await.unwrap();
        let second = backend.submit(&request).await.unwrap();
        assert_eq!(first, Ticket(1));
        assert_eq!(second, Ticket(2));
    }

    #[tokio::test]
    async fn cancel_always_succeeds() {
        let backend = NoOpBackend::new();
        backend.cancel(Ticket(42)).await.unwrap();
    }
}
