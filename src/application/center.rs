//! Notification center use case
//!
//! Owns the backend, the activation registry, the delegate, and the single
//! dispatcher task that drains the backend event queue. The dispatcher
//! handles one event to completion before the next, which is the only
//! serialization the registry needs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::domain::notification::{
    ActivationEvent, CloseReason, NotificationOptions, NotificationRequest, TicketLifecycle,
};

use super::delegate::NotificationDelegate;
use super::ports::{BackendEvent, NotificationBackend, Ticket};
use super::registry::{ActivationCallback, ActivationRegistry};

struct NotificationState {
    request: NotificationRequest,
    lifecycle: Mutex<TicketLifecycle>,
}

/// Ticket correlation state shared between `notify()` and the dispatcher.
///
/// Backend signal listeners run concurrently with `notify()`, so an
/// activation can reach the event queue before `submit` has returned the
/// ticket that identifies it. Submissions in flight are counted so the
/// dispatcher can park events for tickets it cannot resolve yet and retry
/// them once the submission lands.
struct TicketTable {
    entries: Mutex<HashMap<Ticket, Arc<NotificationState>>>,
    submissions_in_flight: AtomicUsize,
    parked: Mutex<Vec<BackendEvent>>,
    retry: Notify,
}

impl TicketTable {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            submissions_in_flight: AtomicUsize::new(0),
            parked: Mutex::new(Vec::new()),
            retry: Notify::new(),
        }
    }

    fn begin_submission(&self) {
        self.submissions_in_flight.fetch_add(1, Ordering::SeqCst);
    }

    /// Record the outcome of one submission and wake the dispatcher so it
    /// can retry any events it parked in the meantime. The entry is
    /// inserted before the in-flight count drops, so a dispatcher that
    /// observes zero submissions in flight also observes the insert.
    fn finish_submission(&self, issued: Option<(Ticket, Arc<NotificationState>)>) {
        if let Some((ticket, state)) = issued {
            self.entries.lock().unwrap().insert(ticket, state);
        }
        self.submissions_in_flight.fetch_sub(1, Ordering::SeqCst);
        self.retry.notify_one();
    }

    fn submission_in_flight(&self) -> bool {
        self.submissions_in_flight.load(Ordering::SeqCst) > 0
    }

    fn get(&self, ticket: Ticket) -> Option<Arc<NotificationState>> {
        self.entries.lock().unwrap().get(&ticket).cloned()
    }

    fn remove(&self, ticket: Ticket) -> Option<Arc<NotificationState>> {
        self.entries.lock().unwrap().remove(&ticket)
    }

    fn park(&self, event: BackendEvent) {
        self.parked.lock().unwrap().push(event);
    }

    fn take_parked(&self) -> Vec<BackendEvent> {
        std::mem::take(&mut *self.parked.lock().unwrap())
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Creates notifications, correlates OS events back to them, and routes
/// activations through the delegate.
pub struct NotificationCenter {
    backend: Arc<dyn NotificationBackend>,
    registry: Arc<ActivationRegistry>,
    delegate: Arc<dyn NotificationDelegate>,
    tickets: Arc<TicketTable>,
    dispatcher: JoinHandle<()>,
}

impl NotificationCenter {
    /// Create a center draining `events` on a dedicated dispatcher task.
    ///
    /// The center owns its delegate for its whole lifetime; isolated
    /// notification groups are obtained by creating another center with its
    /// own registry and backend.
    pub fn new(
        backend: Arc<dyn NotificationBackend>,
        registry: Arc<ActivationRegistry>,
        delegate: Arc<dyn NotificationDelegate>,
        events: mpsc::UnboundedReceiver<BackendEvent>,
    ) -> Self {
        let tickets = Arc::new(TicketTable::new());
        let dispatcher = tokio::spawn(dispatch_loop(
            events,
            Arc::clone(&tickets),
            Arc::clone(&delegate),
        ));

        Self {
            backend,
            registry,
            delegate,
            tickets,
            dispatcher,
        }
    }

    /// Construct and submit one notification.
    ///
    /// When a callback is supplied it is registered *before* submission, so
    /// an activation delivered immediately after display always finds its
    /// entry. Submission failures are silent per the OS contract: the
    /// returned handle is inert but still introspectable.
    pub async fn notify(
        &self,
        options: NotificationOptions,
        on_activate: Option<ActivationCallback>,
    ) -> NotificationHandle {
        let request = NotificationRequest::from_options(options);

        if let Some(callback) = on_activate {
            self.registry
                .register(request.id().to_string(), request.can_reply(), callback);
        }

        let state = Arc::new(NotificationState {
            request: request.clone(),
            lifecycle: Mutex::new(TicketLifecycle::new()),
        });

        let ticket = if self.delegate.should_present(&request) {
            self.tickets.begin_submission();
            match self.backend.submit(&request).await {
                Ok(ticket) => {
                    {
                        // Notify returning means the server accepted the
                        // notification for display.
                        let mut lifecycle = state.lifecycle.lock().unwrap();
                        let _ = lifecycle.submit();
                        let _ = lifecycle.display();
                    }
                    self.tickets
                        .finish_submission(Some((ticket, Arc::clone(&state))));
                    Some(ticket)
                }
                // The OS is the authority; a failed submit is a silent
                // failure to display, with no retry.
                Err(_) => {
                    self.tickets.finish_submission(None);
                    None
                }
            }
        } else {
            None
        };

        NotificationHandle {
            state,
            ticket,
            backend: Arc::clone(&self.backend),
        }
    }

    /// The registry shared with the dispatching delegate
    pub fn registry(&self) -> &Arc<ActivationRegistry> {
        &self.registry
    }

    /// Number of notifications the center is still tracking
    pub fn pending(&self) -> usize {
        self.tickets.len()
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

/// Drains the backend event queue, one event handled to completion at a
/// time. Events for tickets this center never issued belong to foreign
/// notifications and are dropped; events that merely raced an in-flight
/// submission are parked and retried once the submission lands.
async fn dispatch_loop(
    mut events: mpsc::UnboundedReceiver<BackendEvent>,
    tickets: Arc<TicketTable>,
    delegate: Arc<dyn NotificationDelegate>,
) {
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                handle_event(event, &tickets, &delegate);
            }
            _ = tickets.retry.notified() => {
                for event in tickets.take_parked() {
                    handle_event(event, &tickets, &delegate);
                }
            }
        }
    }
}

fn handle_event(
    event: BackendEvent,
    tickets: &TicketTable,
    delegate: &Arc<dyn NotificationDelegate>,
) {
    match event {
        BackendEvent::Activated { ticket, kind } => {
            let state = match tickets.get(ticket) {
                Some(state) => state,
                None if tickets.submission_in_flight() => {
                    tickets.park(BackendEvent::Activated { ticket, kind });
                    return;
                }
                None => {
                    // A submission may have landed between the lookup and
                    // the in-flight check; look once more before treating
                    // the ticket as foreign.
                    match tickets.get(ticket) {
                        Some(state) => state,
                        None => return,
                    }
                }
            };

            // A close racing the activation leaves the lifecycle terminal;
            // the activation is still delivered because the OS already
            // committed to it.
            let _ = state.lifecycle.lock().unwrap().activate();

            delegate.did_activate(ActivationEvent {
                identifier: state.request.id().to_string(),
                kind,
            });
        }
        BackendEvent::Closed { ticket, reason } => {
            let state = match tickets.remove(ticket) {
                Some(state) => state,
                None if tickets.submission_in_flight() => {
                    tickets.park(BackendEvent::Closed { ticket, reason });
                    return;
                }
                None => match tickets.remove(ticket) {
                    Some(state) => state,
                    None => return,
                },
            };

            let mut lifecycle = state.lifecycle.lock().unwrap();
            let _ = match reason {
                CloseReason::Expired => lifecycle.expire(),
                CloseReason::ClosedByCall => lifecycle.withdraw(),
                CloseReason::Dismissed | CloseReason::Undefined => lifecycle.dismiss(),
            };
        }
    }
}

/// Host-facing handle for one submitted notification.
///
/// Read accessors reflect the fields captured at construction, even after
/// `close`.
pub struct NotificationHandle {
    state: Arc<NotificationState>,
    ticket: Option<Ticket>,
    backend: Arc<dyn NotificationBackend>,
}

impl NotificationHandle {
    pub fn id(&self) -> &str {
        self.state.request.id()
    }

    pub fn title(&self) -> &str {
        self.state.request.title()
    }

    pub fn body(&self) -> &str {
        self.state.request.body()
    }

    pub fn icon(&self) -> &str {
        self.state.request.icon()
    }

    pub fn sound_name(&self) -> &str {
        self.state.request.sound_name()
    }

    pub fn can_reply(&self) -> bool {
        self.state.request.can_reply()
    }

    pub fn bundle_id(&self) -> &'static str {
        self.state.request.bundle_id()
    }

    /// The underlying request value object
    pub fn request(&self) -> &NotificationRequest {
        &self.state.request
    }

    /// Whether the OS accepted the notification for display
    pub fn is_active(&self) -> bool {
        self.ticket.is_some()
    }

    /// Withdraw the notification.
    ///
    /// Idempotent and infallible: closing an already-closed, dismissed, or
    /// never-submitted notification is a no-op. The activation registry
    /// entry is left in place so an activation the OS already queued can
    /// still be delivered; there is no way to cancel an in-flight callback.
    pub async fn close(&self) {
        let Some(ticket) = self.ticket else { return };

        {
            let mut lifecycle = self.state.lifecycle.lock().unwrap();
            if lifecycle.is_terminal() {
                return;
            }
            let _ = lifecycle.withdraw();
        }

        // Fire and forget; the OS provides no recoverable-error channel.
        let _ = self.backend.cancel(ticket).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::delegate::ActivationDelegate;
    use crate::application::ports::{BackendError, BackendEventSender};
    use crate::domain::notification::ActivationKind;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Backend that issues sequential tickets and records calls.
    struct MockBackend {
        next_ticket: AtomicU32,
        submitted: Mutex<Vec<NotificationRequest>>,
        cancelled: Mutex<Vec<Ticket>>,
        fail_submit: bool,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                next_ticket: AtomicU32::new(1),
                submitted: Mutex::new(Vec::new()),
                cancelled: Mutex::new(Vec::new()),
                fail_submit: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_submit: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl NotificationBackend for MockBackend {
        async fn submit(&self, request: &NotificationRequest) -> Result<Ticket, BackendError> {
            if self.fail_submit {
                return Err(BackendError::SubmitFailed("service unavailable".into()));
            }
            self.submitted.lock().unwrap().push(request.clone());
            Ok(Ticket(self.next_ticket.fetch_add(1, Ordering::SeqCst)))
        }

        async fn cancel(&self, ticket: Ticket) -> Result<(), BackendError> {
            self.cancelled.lock().unwrap().push(ticket);
            Ok(())
        }
    }

    /// Backend whose activation signal overtakes the submit reply: the
    /// event is on the queue before `submit` has returned the ticket.
    struct RacingBackend {
        events: BackendEventSender,
    }

    #[async_trait]
    impl NotificationBackend for RacingBackend {
        async fn submit(&self, _request: &NotificationRequest) -> Result<Ticket, BackendError> {
            self.events
                .send(BackendEvent::Activated {
                    ticket: Ticket(1),
                    kind: ActivationKind::Clicked,
                })
                .unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(Ticket(1))
        }

        async fn cancel(&self, _ticket: Ticket) -> Result<(), BackendError> {
            Ok(())
        }
    }

    struct Harness {
        center: NotificationCenter,
        backend: Arc<MockBackend>,
        registry: Arc<ActivationRegistry>,
        events: BackendEventSender,
    }

    fn harness_with(backend: MockBackend) -> Harness {
        let backend = Arc::new(backend);
        let registry = Arc::new(ActivationRegistry::new());
        let delegate = Arc::new(ActivationDelegate::new(Arc::clone(&registry)));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let center = NotificationCenter::new(
            Arc::clone(&backend) as Arc<dyn NotificationBackend>,
            Arc::clone(&registry),
            delegate,
            events_rx,
        );
        Harness {
            center,
            backend,
            registry,
            events: events_tx,
        }
    }

    fn harness() -> Harness {
        harness_with(MockBackend::new())
    }

    fn options(id: &str) -> NotificationOptions {
        NotificationOptions {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn notify_submits_and_reads_back_fields() {
        let h = harness();

        let handle = h
            .center
            .notify(
                NotificationOptions {
                    id: Some("n1".to_string()),
                    title: Some("Hi".to_string()),
                    body: Some("there".to_string()),
                    icon: Some("mail-unread".to_string()),
                    sound: Some("bell".to_string()),
                    has_reply: true,
                },
                None,
            )
            .await;

        assert_eq!(handle.id(), "n1");
        assert_eq!(handle.title(), "Hi");
        assert_eq!(handle.body(), "there");
        assert_eq!(handle.icon(), "mail-unread");
        assert_eq!(handle.sound_name(), "bell");
        assert!(handle.can_reply());
        assert!(!handle.bundle_id().is_empty());

        let submitted = h.backend.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].id(), "n1");
    }

    #[tokio::test]
    async fn notify_with_defaults_reads_back_empty_fields() {
        let h = harness();
        let handle = h.center.notify(NotificationOptions::default(), None).await;

        assert_eq!(handle.id(), "");
        assert_eq!(handle.title(), "");
        assert_eq!(handle.body(), "");
        assert_eq!(handle.icon(), "");
        assert_eq!(handle.sound_name(), "");
        assert!(!handle.can_reply());
    }

    #[tokio::test]
    async fn callback_is_registered_before_submission() {
        let h = harness();

        h.center
            .notify(options("n1"), Some(Box::new(|_, _| {})))
            .await;

        // The mock backend saw the submit; the registry entry must already
        // have existed at that point. Submission succeeded, so the entry is
        // still pending.
        assert!(h.registry.contains("n1"));
        assert_eq!(h.backend.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn click_activation_invokes_callback_once() {
        let h = harness();
        let calls = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = oneshot::channel();

        let counter = Arc::clone(&calls);
        let mut done_tx = Some(done_tx);
        h.center
            .notify(
                options("n1"),
                Some(Box::new(move |is_reply, response| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if let Some(tx) = done_tx.take() {
                        let _ = tx.send((is_reply, response));
                    }
                })),
            )
            .await;

        h.events
            .send(BackendEvent::Activated {
                ticket: Ticket(1),
                kind: ActivationKind::Clicked,
            })
            .unwrap();

        let (is_reply, response) = done_rx.await.unwrap();
        assert!(!is_reply);
        assert_eq!(response, "");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A duplicate activation is silently dropped.
        h.events
            .send(BackendEvent::Activated {
                ticket: Ticket(1),
                kind: ActivationKind::Clicked,
            })
            .unwrap();
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reply_activation_carries_text() {
        let h = harness();
        let (done_tx, done_rx) = oneshot::channel();

        let mut done_tx = Some(done_tx);
        h.center
            .notify(
                NotificationOptions {
                    id: Some("n1".to_string()),
                    title: Some("Hi".to_string()),
                    body: Some("there".to_string()),
                    has_reply: true,
                    ..Default::default()
                },
                Some(Box::new(move |is_reply, response| {
                    if let Some(tx) = done_tx.take() {
                        let _ = tx.send((is_reply, response));
                    }
                })),
            )
            .await;

        h.events
            .send(BackendEvent::Activated {
                ticket: Ticket(1),
                kind: ActivationKind::Replied("thanks".to_string()),
            })
            .unwrap();

        let (is_reply, response) = done_rx.await.unwrap();
        assert!(is_reply);
        assert_eq!(response, "thanks");
    }

    #[tokio::test]
    async fn activation_arriving_during_submission_is_delivered() {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let backend = Arc::new(RacingBackend { events: events_tx });
        let registry = Arc::new(ActivationRegistry::new());
        let delegate = Arc::new(ActivationDelegate::new(Arc::clone(&registry)));
        let center = NotificationCenter::new(backend, registry, delegate, events_rx);

        let (done_tx, done_rx) = oneshot::channel();
        let mut done_tx = Some(done_tx);
        center
            .notify(
                options("n1"),
                Some(Box::new(move |is_reply, response| {
                    if let Some(tx) = done_tx.take() {
                        let _ = tx.send((is_reply, response));
                    }
                })),
            )
            .await;

        // The activation reached the queue before the ticket was known;
        // it must still be delivered once the submission lands.
        let (is_reply, response) = done_rx.await.unwrap();
        assert!(!is_reply);
        assert_eq!(response, "");
        assert_eq!(center.pending(), 1);
    }

    #[tokio::test]
    async fn foreign_ticket_events_are_dropped() {
        let h = harness();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        h.center
            .notify(
                options("n1"),
                Some(Box::new(move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .await;

        // Ticket 99 was never issued by this center.
        h.events
            .send(BackendEvent::Activated {
                ticket: Ticket(99),
                kind: ActivationKind::Clicked,
            })
            .unwrap();
        tokio::task::yield_now().await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(h.registry.contains("n1"));
    }

    #[tokio::test]
    async fn close_is_idempotent_and_keeps_getters() {
        let h = harness();
        let handle = h
            .center
            .notify(
                NotificationOptions {
                    id: Some("n1".to_string()),
                    title: Some("Hi".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await;

        handle.close().await;
        handle.close().await;

        // Only the first close reaches the backend.
        assert_eq!(h.backend.cancelled.lock().unwrap().len(), 1);
        assert_eq!(handle.id(), "n1");
        assert_eq!(handle.title(), "Hi");
    }

    #[tokio::test]
    async fn activation_racing_a_close_is_still_delivered() {
        let h = harness();
        let (done_tx, done_rx) = oneshot::channel();

        let mut done_tx = Some(done_tx);
        let handle = h
            .center
            .notify(
                options("n1"),
                Some(Box::new(move |is_reply, response| {
                    if let Some(tx) = done_tx.take() {
                        let _ = tx.send((is_reply, response));
                    }
                })),
            )
            .await;

        handle.close().await;

        // The OS had already queued the activation before the close took
        // effect; the callback still fires.
        h.events
            .send(BackendEvent::Activated {
                ticket: Ticket(1),
                kind: ActivationKind::Clicked,
            })
            .unwrap();

        let (is_reply, response) = done_rx.await.unwrap();
        assert!(!is_reply);
        assert_eq!(response, "");
    }

    #[tokio::test]
    async fn failed_submission_yields_inert_handle() {
        let h = harness_with(MockBackend::failing());

        let handle = h
            .center
            .notify(
                NotificationOptions {
                    id: Some("n1".to_string()),
                    title: Some("Hi".to_string()),
                    ..Default::default()
                },
                Some(Box::new(|_, _| {})),
            )
            .await;

        // Still introspectable, close is a no-op, nothing was cancelled.
        assert_eq!(handle.title(), "Hi");
        handle.close().await;
        assert!(h.backend.cancelled.lock().unwrap().is_empty());
        assert_eq!(h.center.pending(), 0);
    }

    #[tokio::test]
    async fn closed_event_releases_the_ticket() {
        let h = harness();
        h.center.notify(options("n1"), None).await;
        assert_eq!(h.center.pending(), 1);

        h.events
            .send(BackendEvent::Closed {
                ticket: Ticket(1),
                reason: CloseReason::Dismissed,
            })
            .unwrap();
        tokio::task::yield_now().await;

        assert_eq!(h.center.pending(), 0);
    }
}
