//! Activation and close events delivered by the OS integration layer

/// How the user activated a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationKind {
    /// The notification itself was clicked.
    Clicked,
    /// The user submitted inline-reply text.
    Replied(String),
}

/// One user activation, produced by the OS integration layer and consumed
/// exactly once by the registry lookup that dispatches to a host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
    /// Identifier of the originating notification request.
    pub identifier: String,
    pub kind: ActivationKind,
}

/// Reason the OS reported for closing a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Notification timed out.
    Expired,
    /// Notification was dismissed by the user.
    Dismissed,
    /// Notification was closed by an explicit close call.
    ClosedByCall,
    /// Unknown/unspecified reason.
    Undefined,
}

impl CloseReason {
    /// Map a freedesktop `NotificationClosed` reason code.
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Expired,
            2 => Self::Dismissed,
            3 => Self::ClosedByCall,
            _ => Self::Undefined,
        }
    }
}
