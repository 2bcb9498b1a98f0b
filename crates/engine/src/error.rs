//! The module contains the errors the engine can return.
//!
//! The split computation itself never fails; errors only come from the
//! mutation paths that guard the bill invariants:
//!
//! - [`InvalidName`] a participant or item name is empty.
//! - [`InvalidAmount`] a price cannot be parsed or overflows.
//! - [`KeyNotFound`] a participant or item id is not on the bill.
//! - [`InvalidBill`] restored parts break a bill invariant.
//!
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidBill`]: EngineError::InvalidBill
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid bill: {0}")]
    InvalidBill(String),
}
