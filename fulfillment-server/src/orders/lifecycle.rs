//! Order lifecycle state machine
//!
//! ```text
//! PENDING --(station starts prep)--> PREPARING --(station finishes)--> READY --(waiter serves)--> SERVED
//! ```
//!
//! The target of an `advance` must be the exact successor of the current
//! status: no skipping, no repeats ("already READY" is an error, not a
//! silent no-op), no backward moves. Under concurrent polling this is the
//! property that turns a lost race into a clean `InvalidTransition` instead
//! of a double-application.
//!
//! Deliberately absent: station-level authorization on `advance`. Any
//! terminal may advance any order, whether or not its items are on it.
//! Observed behavior, reproduced as-is.

use shared::order::{Order, OrderStatus, StatusChange};

use super::{WorkflowError, WorkflowResult};

/// Check that `target` is the exact successor of `current`
pub fn validate_advance(current: OrderStatus, target: OrderStatus) -> WorkflowResult<()> {
    match current.successor() {
        Some(next) if next == target => Ok(()),
        Some(next) => Err(WorkflowError::InvalidTransition(format!(
            "cannot move from {} to {}, expected {}",
            current, target, next
        ))),
        None => Err(WorkflowError::InvalidTransition(format!(
            "order is already {} and cannot advance",
            current
        ))),
    }
}

/// Apply a validated advance, recording the audit entry
pub fn apply_advance(order: &mut Order, target: OrderStatus, actor: &str, at: i64) {
    let from = order.status;
    order.status = target;
    order.updated_at = at;
    order.status_history.push(StatusChange {
        from,
        to: target,
        actor: actor.to_string(),
        at,
    });
}
