//! Utilities Module
//!
//! Error handling and logging infrastructure.

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult};
