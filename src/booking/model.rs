//! Booking model and status state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a booking.
///
/// Progresses linearly: Pending → Accepted → InProgress → Completed.
/// `Cancelled` is reachable from any non-terminal status. `Completed`
/// and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// The single forward status, or None at a terminal state.
    pub fn next(&self) -> Option<BookingStatus> {
        use BookingStatus::*;
        match self {
            Pending => Some(Accepted),
            Accepted => Some(InProgress),
            InProgress => Some(Completed),
            Completed | Cancelled => None,
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a cancellation is still allowed from this status.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Check if a transition from `self` to `target` is legal:
    /// the single forward step, or a cancel from a non-terminal state.
    /// No skips, no regressions.
    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        if target == BookingStatus::Cancelled {
            return self.can_cancel();
        }
        self.next() == Some(target)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// A unit of contracted work between a client and a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub address: String,
    pub price: Decimal,
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            service_type: "plumbing".to_string(),
            scheduled_at: Utc::now(),
            address: "12 Hill Rd, Accra".to_string(),
            price: dec!(120.00),
            status,
        }
    }

    // ── Forward progression ─────────────────────────────────────────

    #[test]
    fn next_walks_the_forward_graph() {
        use BookingStatus::*;
        let mut current = Pending;
        for expected in [Accepted, InProgress, Completed] {
            let next = current.next().unwrap();
            assert_eq!(next, expected);
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn next_is_none_at_terminal_states() {
        assert!(BookingStatus::Completed.next().is_none());
        assert!(BookingStatus::Cancelled.next().is_none());
    }

    // ── Transition legality ─────────────────────────────────────────

    #[test]
    fn forward_steps_are_legal() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
    }

    #[test]
    fn skips_and_regressions_are_illegal() {
        use BookingStatus::*;
        // Skip
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Accepted.can_transition_to(Completed));
        // Regress
        assert!(!InProgress.can_transition_to(Accepted));
        assert!(!Completed.can_transition_to(Pending));
        // Self
        assert!(!Accepted.can_transition_to(Accepted));
    }

    #[test]
    fn cancel_is_legal_only_from_non_terminal_states() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_statuses() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Accepted.is_terminal());
        assert!(!BookingStatus::InProgress.is_terminal());
    }

    // ── Serde ───────────────────────────────────────────────────────

    #[test]
    fn status_display_matches_serde() {
        use BookingStatus::*;
        for status in [Pending, Accepted, InProgress, Completed, Cancelled] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{status}\""), json);
        }
    }

    #[test]
    fn booking_serde_roundtrip() {
        let original = booking(BookingStatus::Accepted);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
