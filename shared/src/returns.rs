//! Return-approval request types
//!
//! A ReturnRequest reverses some or all of an already-placed order. It moves
//! through a two-stage approval: a preparation-station sign-off followed by
//! an administrative sign-off. Terminal states are final; the record is
//! immutable except for `status` and `station_approvals`, which only
//! advance/grow.

use crate::order::types::Station;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Return request status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    #[default]
    Requested,
    ApprovedStation,
    ApprovedAdmin,
    Rejected,
}

impl ReturnStatus {
    /// Whether this status ends the approval workflow
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReturnStatus::ApprovedAdmin | ReturnStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Requested => "REQUESTED",
            ReturnStatus::ApprovedStation => "APPROVED_STATION",
            ReturnStatus::ApprovedAdmin => "APPROVED_ADMIN",
            ReturnStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to reverse some or all of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnRequest {
    /// Return request ID (assigned by server)
    pub id: String,
    /// The order being reversed
    pub order_ref: String,
    /// Operator-supplied reason, non-empty
    pub reason: String,
    /// Approval workflow status
    pub status: ReturnStatus,
    /// Stations implicated by the order, snapshotted at creation and never
    /// recomputed
    pub required_stations: BTreeSet<Station>,
    /// Stations that have signed off, grow-only
    #[serde(default)]
    pub station_approvals: BTreeSet<Station>,
    /// Creation timestamp (epoch millis)
    pub requested_at: i64,
    /// Operator who filed the request
    pub requested_by: String,
    /// Set when a terminal state is reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
    /// Operator who resolved the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
}

impl ReturnRequest {
    /// Create a new REQUESTED return for an order
    pub fn new(
        id: String,
        order_ref: String,
        reason: String,
        required_stations: BTreeSet<Station>,
        requested_by: String,
    ) -> Self {
        Self {
            id,
            order_ref,
            reason,
            status: ReturnStatus::Requested,
            required_stations,
            station_approvals: BTreeSet::new(),
            requested_at: chrono::Utc::now().timestamp_millis(),
            requested_by,
            resolved_at: None,
            resolved_by: None,
        }
    }

    /// Check if the workflow is still in flight
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether the given station is in the creation-time station snapshot
    pub fn requires_station(&self, station: Station) -> bool {
        self.required_stations.contains(&station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ReturnStatus::Requested.is_terminal());
        assert!(!ReturnStatus::ApprovedStation.is_terminal());
        assert!(ReturnStatus::ApprovedAdmin.is_terminal());
        assert!(ReturnStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_new_request_snapshot() {
        let request = ReturnRequest::new(
            "ret-1".to_string(),
            "order-1".to_string(),
            "guest changed mind".to_string(),
            BTreeSet::from([Station::Kitchen, Station::Bar]),
            "waiter-3".to_string(),
        );
        assert_eq!(request.status, ReturnStatus::Requested);
        assert!(request.is_open());
        assert!(request.requires_station(Station::Bar));
        assert!(request.station_approvals.is_empty());
        assert!(request.resolved_at.is_none());
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&ReturnStatus::ApprovedStation).unwrap(),
            "\"APPROVED_STATION\""
        );
    }
}
