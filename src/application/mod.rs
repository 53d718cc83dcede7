//! Application layer: use cases and port interfaces

pub mod center;
pub mod delegate;
pub mod ports;
pub mod registry;

pub use center::{NotificationCenter, NotificationHandle};
pub use delegate::{ActivationDelegate, NotificationDelegate, PresentationDelegate};
pub use registry::{ActivationCallback, ActivationRegistry};
