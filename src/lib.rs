//! desk-notify - desktop notifications with activation callbacks
//!
//! Sends desktop notifications and routes user activations (a click on the
//! notification body or an inline reply) back to host-supplied callbacks.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Notification value objects, the ticket lifecycle, and errors
//! - **Application**: The notification center, activation registry, delegates,
//!   and port interfaces (traits)
//! - **Infrastructure**: Backend adapters (D-Bus on Linux, notify-rust
//!   elsewhere) and config storage
//! - **CLI**: Command-line interface and argument parsing

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
