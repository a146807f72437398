//! Return-approval state machine
//!
//! ```text
//! REQUESTED --(required-station approves)--> APPROVED_STATION
//! APPROVED_STATION --(admin approves)--> APPROVED_ADMIN   [terminal]
//! REQUESTED | APPROVED_STATION --(reject)--> REJECTED     [terminal]
//! ```
//!
//! Any one required station's approval moves the request out of REQUESTED,
//! even on a multi-station order. Observed contract, reproduced as-is;
//! `station_approvals` still records who signed off.

use shared::order::{Order, Station};
use shared::returns::{ReturnRequest, ReturnStatus};
use std::collections::BTreeSet;

use super::{WorkflowError, WorkflowResult, routing};

/// Build a new REQUESTED return for an order
///
/// Snapshots the order's required stations at creation time; the snapshot is
/// never recomputed, so later item edits cannot change who may approve.
pub fn new_request(order: &Order, id: String, reason: String, actor: &str) -> ReturnRequest {
    let required: BTreeSet<Station> = routing::required_stations(order);
    ReturnRequest::new(
        id,
        order.id.clone(),
        reason,
        required,
        actor.to_string(),
    )
}

/// Apply a station sign-off
///
/// Fails with `NotAuthorized` for stations outside the creation-time
/// snapshot, and `InvalidState` unless the request is still REQUESTED.
pub fn apply_station_approval(
    request: &mut ReturnRequest,
    station: Station,
) -> WorkflowResult<()> {
    if !request.requires_station(station) {
        return Err(WorkflowError::NotAuthorized(format!(
            "station {} is not required for return {}",
            station, request.id
        )));
    }
    if request.status != ReturnStatus::Requested {
        return Err(WorkflowError::InvalidState(format!(
            "return {} is {} and no longer accepts station approval",
            request.id, request.status
        )));
    }

    request.station_approvals.insert(station);
    request.status = ReturnStatus::ApprovedStation;
    Ok(())
}

/// Apply the administrative sign-off, terminal-izing the request
pub fn apply_admin_approval(
    request: &mut ReturnRequest,
    actor: &str,
    at: i64,
) -> WorkflowResult<()> {
    if request.status != ReturnStatus::ApprovedStation {
        return Err(WorkflowError::InvalidState(format!(
            "return {} is {} and cannot receive admin approval",
            request.id, request.status
        )));
    }

    request.status = ReturnStatus::ApprovedAdmin;
    request.resolved_at = Some(at);
    request.resolved_by = Some(actor.to_string());
    Ok(())
}

/// Reject the request from either non-terminal state
pub fn apply_rejection(request: &mut ReturnRequest, actor: &str, at: i64) -> WorkflowResult<()> {
    if request.status.is_terminal() {
        return Err(WorkflowError::InvalidState(format!(
            "return {} is already {}",
            request.id, request.status
        )));
    }

    request.status = ReturnStatus::Rejected;
    request.resolved_at = Some(at);
    request.resolved_by = Some(actor.to_string());
    Ok(())
}
