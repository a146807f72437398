//! Order Workflow Module
//!
//! The order fulfillment core:
//!
//! - **storage**: redb-based persistence for orders, returns and indices
//! - **manager**: transactional coordinator for every mutation
//! - **lifecycle**: PENDING → PREPARING → READY → SERVED state machine
//! - **routing**: station derivation and station-scoped projections
//! - **returns**: two-stage return-approval state machine
//! - **projections**: read models for the polling terminals
//! - **money**: precise decimal arithmetic for derived totals
//!
//! # Mutation Flow
//!
//! ```text
//! Request → OrdersManager → validate (lifecycle/returns) → Storage (redb)
//!                                                              ↓
//!                                                     commit = linearization point
//! ```
//!
//! Every mutation runs inside a single redb write transaction. redb admits
//! one writer at a time, so transitions against the same entity serialize:
//! two terminals racing the same `advance` produce exactly one success and
//! one `InvalidTransition`. Retried calls fail the same way instead of
//! double-applying, which is what makes blind polling retries safe.

pub mod lifecycle;
pub mod manager;
pub mod money;
pub mod projections;
pub mod returns;
pub mod routing;
pub mod storage;

use thiserror::Error;

pub use manager::OrdersManager;
pub use projections::ActiveOrdersFilter;
pub use storage::{OrderStore, StorageError};

/// Workflow errors
///
/// The four caller-visible kinds from the error taxonomy plus a storage
/// fan-in. `InvalidTransition`/`InvalidState` are benign under concurrent
/// polling; `NotFound`/`NotAuthorized` indicate genuine misuse.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Return request not found: {0}")]
    ReturnNotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl From<redb::CommitError> for WorkflowError {
    fn from(err: redb::CommitError) -> Self {
        WorkflowError::Storage(StorageError::from(err))
    }
}

impl From<WorkflowError> for crate::utils::AppError {
    fn from(err: WorkflowError) -> Self {
        use crate::utils::AppError;
        match err {
            WorkflowError::OrderNotFound(id) => AppError::NotFound(format!("Order {}", id)),
            WorkflowError::ReturnNotFound(id) => {
                AppError::NotFound(format!("Return request {}", id))
            }
            WorkflowError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            WorkflowError::InvalidState(msg) => AppError::InvalidState(msg),
            WorkflowError::NotAuthorized(msg) => AppError::Forbidden(msg),
            WorkflowError::Validation(msg) => AppError::Validation(msg),
            WorkflowError::Storage(e) => {
                tracing::error!(error = %e, "Storage error in workflow");
                AppError::Storage(e.to_string())
            }
        }
    }
}
