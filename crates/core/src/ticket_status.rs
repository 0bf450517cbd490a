//! Ticket lifecycle.
//!
//! A ticket starts `active` and may move once, to either `used` or
//! `cancelled`. Both of those are terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status of a purchased ticket, stored as text in `tickets.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Used,
    Cancelled,
}

impl TicketStatus {
    /// Database / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from the database `status` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "active" => Ok(Self::Active),
            "used" => Ok(Self::Used),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket status '{other}'. Must be one of: active, used, cancelled"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Used) | (Self::Active, Self::Cancelled)
        )
    }

    /// Validate a transition, returning the new status.
    pub fn transition(self, next: TicketStatus) -> Result<TicketStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Ticket cannot move from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn active_moves_to_used_or_cancelled() {
        assert_eq!(
            TicketStatus::Active.transition(TicketStatus::Used).unwrap(),
            TicketStatus::Used
        );
        assert_eq!(
            TicketStatus::Active
                .transition(TicketStatus::Cancelled)
                .unwrap(),
            TicketStatus::Cancelled
        );
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [TicketStatus::Used, TicketStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in [
                TicketStatus::Active,
                TicketStatus::Used,
                TicketStatus::Cancelled,
            ] {
                assert_matches!(from.transition(to), Err(CoreError::Conflict(_)));
            }
        }
    }

    #[test]
    fn active_to_active_is_rejected() {
        assert_matches!(
            TicketStatus::Active.transition(TicketStatus::Active),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn names_round_trip_through_the_column_format() {
        assert_eq!(TicketStatus::from_name("used").unwrap(), TicketStatus::Used);
        assert_eq!(TicketStatus::Cancelled.to_string(), "cancelled");
        assert_matches!(
            TicketStatus::from_name("refunded"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TicketStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
