//! Amount validation and number formatting
//!
//! Two independent routines:
//! - [`validate_amount`]: the contribution amount grammar, padded to two decimals
//! - [`format_number`]: the general formatter bound to `.currency` style fields

pub mod amount;
pub mod error;
pub mod number;

pub use amount::{validate_amount, NormalizedAmount};
pub use error::FormatError;
pub use number::format_number;
pub use zcomix_config::FormatSettings;
