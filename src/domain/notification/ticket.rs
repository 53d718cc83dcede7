//! Notification ticket lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Lifecycle states for one notification ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TicketState {
    #[default]
    Created,
    Submitted,
    Displayed,
    Activated,
    Dismissed,
    Expired,
    Withdrawn,
}

impl TicketState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Submitted => "submitted",
            Self::Displayed => "displayed",
            Self::Activated => "activated",
            Self::Dismissed => "dismissed",
            Self::Expired => "expired",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Terminal states produce no further observable effect.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Activated | Self::Dismissed | Self::Expired | Self::Withdrawn
        )
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid ticket transition is attempted
#[derive(Debug, Clone, Error)]
#[error("invalid ticket transition: cannot {action} while in {current_state} state")]
pub struct InvalidTicketTransition {
    pub current_state: TicketState,
    pub action: &'static str,
}

/// Tracks one notification ticket through its lifecycle.
///
/// State machine:
///   CREATED -> SUBMITTED (submit)
///   SUBMITTED -> DISPLAYED (display)
///   SUBMITTED | DISPLAYED -> ACTIVATED (activate)
///   SUBMITTED | DISPLAYED -> DISMISSED (dismiss)
///   SUBMITTED | DISPLAYED -> EXPIRED (expire)
///   SUBMITTED | DISPLAYED -> WITHDRAWN (withdraw)
///
/// Activation events may arrive before the display confirmation, so the
/// terminal transitions accept both SUBMITTED and DISPLAYED.
#[derive(Debug, Default)]
pub struct TicketLifecycle {
    state: TicketState,
}

impl TicketLifecycle {
    /// Create a new lifecycle in the created state
    pub fn new() -> Self {
        Self {
            state: TicketState::Created,
        }
    }

    /// Get the current state
    pub fn state(&self) -> TicketState {
        self.state
    }

    /// Whether the ticket has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Transition from CREATED to SUBMITTED
    pub fn submit(&mut self) -> Result<(), InvalidTicketTransition> {
        if self.state != TicketState::Created {
            return Err(InvalidTicketTransition {
                current_state: self.state,
                action: "submit",
            });
        }
        self.state = TicketState::Submitted;
        Ok(())
    }

    /// Transition from SUBMITTED to DISPLAYED
    pub fn display(&mut self) -> Result<(), InvalidTicketTransition> {
        if self.state != TicketState::Submitted {
            return Err(InvalidTicketTransition {
                current_state: self.state,
                action: "display",
            });
        }
        self.state = TicketState::Displayed;
        Ok(())
    }

    /// Transition to ACTIVATED after a user activation
    pub fn activate(&mut self) -> Result<(), InvalidTicketTransition> {
        self.terminal_transition(TicketState::Activated, "activate")
    }

    /// Transition to DISMISSED after the user dismissed the notification
    pub fn dismiss(&mut self) -> Result<(), InvalidTicketTransition> {
        self.terminal_transition(TicketState::Dismissed, "dismiss")
    }

    /// Transition to EXPIRED after the notification timed out
    pub fn expire(&mut self) -> Result<(), InvalidTicketTransition> {
        self.terminal_transition(TicketState::Expired, "expire")
    }

    /// Transition to WITHDRAWN after an explicit close
    pub fn withdraw(&mut self) -> Result<(), InvalidTicketTransition> {
        self.terminal_transition(TicketState::Withdrawn, "withdraw")
    }

    fn terminal_transition(
        &mut self,
        target: TicketState,
        action: &'static str,
    ) -> Result<(), InvalidTicketTransition> {
        match self.state {
            TicketState::Submitted | TicketState::Displayed => {
                self.state = target;
                Ok(())
            }
            _ => Err(InvalidTicketTransition {
                current_state: self.state,
                action,
            }),
        }
    }
}
