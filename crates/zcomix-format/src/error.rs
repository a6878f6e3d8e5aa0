//! Error types for zcomix-format

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid amount: {input:?}")]
    InvalidAmount { input: String },
}
