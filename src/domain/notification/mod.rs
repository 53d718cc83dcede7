//! Notification value objects, events, and ticket lifecycle

pub mod event;
pub mod request;
pub mod ticket;

pub use event::{ActivationEvent, ActivationKind, CloseReason};
pub use request::{bundle_id, NotificationOptions, NotificationRequest};
pub use ticket::{InvalidTicketTransition, TicketLifecycle, TicketState};
