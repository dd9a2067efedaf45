//! Order State Machine
//!
//! Validates lifecycle transitions.

use crate::model::OrderStatus;
use crate::order_actor::OrderError;

/// Order State Machine for validating transitions.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        use crate::model::OrderStatus::*;
        matches!(
            (from, to),
            (Created, Assigned)
                | (Assigned, Preparing)
                | (Preparing, Ready)
                | (Ready, Dispatched)
                | (Dispatched, Delivered)
                // Any non-terminal status may be cancelled
                | (Created | Assigned | Preparing | Ready | Dispatched, Cancelled)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] if the graph has no such edge.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition { from, to })
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|to| Self::is_valid_transition(from, *to))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus::*;

    #[test]
    fn test_happy_path_is_valid() {
        let path = [Created, Assigned, Preparing, Ready, Dispatched, Delivered];
        for pair in path.windows(2) {
            assert!(
                OrderStateMachine::is_valid_transition(pair[0], pair[1]),
                "{} -> {} should be valid",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_cancel_from_every_non_terminal_state() {
        for from in [Created, Assigned, Preparing, Ready, Dispatched] {
            assert!(OrderStateMachine::is_valid_transition(from, Cancelled));
        }
        assert!(!OrderStateMachine::is_valid_transition(Delivered, Cancelled));
        assert!(!OrderStateMachine::is_valid_transition(Cancelled, Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_successors() {
        assert!(OrderStateMachine::valid_next_states(Delivered).is_empty());
        assert!(OrderStateMachine::valid_next_states(Cancelled).is_empty());
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!OrderStateMachine::is_valid_transition(Created, Preparing));
        assert!(!OrderStateMachine::is_valid_transition(Ready, Preparing));
        assert!(!OrderStateMachine::is_valid_transition(Assigned, Assigned));
        assert_eq!(
            OrderStateMachine::validate_transition(Delivered, Created),
            Err(OrderError::InvalidTransition {
                from: Delivered,
                to: Created
            })
        );
    }

    #[test]
    fn test_valid_next_states() {
        assert_eq!(
            OrderStateMachine::valid_next_states(Created),
            vec![Assigned, Cancelled]
        );
        assert_eq!(
            OrderStateMachine::valid_next_states(Dispatched),
            vec![Delivered, Cancelled]
        );
    }

    #[test]
    fn test_graph_only_moves_forward() {
        // Every edge goes to a later status, so a status is never revisited.
        for from in OrderStatus::ALL {
            for to in OrderStateMachine::valid_next_states(from) {
                assert!(to > from, "{from} -> {to} goes backwards");
            }
        }
    }
}
