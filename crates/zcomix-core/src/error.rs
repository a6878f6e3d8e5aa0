//! Error types for zcomix-core
//!
//! Widget handlers return [`CoreError`]; the runtime logs it according to
//! its severity and carries on. No widget error is fatal to the page.

use thiserror::Error;
use zcomix_config::ConfigError;
use zcomix_format::FormatError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Widget id not installed on the runtime
    UnknownWidget,
    /// Required element missing from the widget scope
    ElementNotFound,
    /// Element id does not carry the expected index
    MalformedIdentifier,
    /// Slide index outside the gallery
    SlideOutOfRange,
    /// Slide without a readable image
    MissingImage,
    /// Amount or number formatting error
    FormatError,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::UnknownWidget => write!(f, "UNKNOWN_WIDGET"),
            ErrorCode::ElementNotFound => write!(f, "ELEMENT_NOT_FOUND"),
            ErrorCode::MalformedIdentifier => write!(f, "MALFORMED_IDENTIFIER"),
            ErrorCode::SlideOutOfRange => write!(f, "SLIDE_OUT_OF_RANGE"),
            ErrorCode::MissingImage => write!(f, "MISSING_IMAGE"),
            ErrorCode::FormatError => write!(f, "FORMAT_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected during normal use
    Info,
    /// Page markup does not match what the widget expects
    Warning,
    /// Widget cannot work at all
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for zcomix-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown widget: {id}")]
    UnknownWidget { id: usize },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Malformed identifier: {id:?}")]
    MalformedIdentifier { id: String },

    #[error("Slide {index} out of range for {count} slides")]
    SlideOutOfRange { index: usize, count: usize },

    #[error("Slide {index} has no image")]
    MissingImage { index: usize },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::UnknownWidget { .. } => ErrorCode::UnknownWidget,
            CoreError::ElementNotFound { .. } => ErrorCode::ElementNotFound,
            CoreError::MalformedIdentifier { .. } => ErrorCode::MalformedIdentifier,
            CoreError::SlideOutOfRange { .. } => ErrorCode::SlideOutOfRange,
            CoreError::MissingImage { .. } => ErrorCode::MissingImage,
            CoreError::Format(_) => ErrorCode::FormatError,
            CoreError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Format(_) => ErrorSeverity::Info,
            CoreError::SlideOutOfRange { .. } => ErrorSeverity::Warning,
            CoreError::MalformedIdentifier { .. } => ErrorSeverity::Warning,
            CoreError::MissingImage { .. } => ErrorSeverity::Warning,
            CoreError::ElementNotFound { .. } => ErrorSeverity::Warning,
            CoreError::UnknownWidget { .. } => ErrorSeverity::Error,
            CoreError::Config(_) => ErrorSeverity::Error,
        }
    }

    /// Log the error at a level matching its severity
    pub fn log(&self, context: &str) {
        match self.severity() {
            ErrorSeverity::Info => log::info!("{}: [{}] {}", context, self.code(), self),
            ErrorSeverity::Warning => log::warn!("{}: [{}] {}", context, self.code(), self),
            ErrorSeverity::Error => log::error!("{}: [{}] {}", context, self.code(), self),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::SlideOutOfRange.to_string(), "SLIDE_OUT_OF_RANGE");
        assert_eq!(ErrorCode::ElementNotFound.to_string(), "ELEMENT_NOT_FOUND");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::SlideOutOfRange { index: 7, count: 3 };
        assert_eq!(error.code(), ErrorCode::SlideOutOfRange);
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.to_string(), "Slide 7 out of range for 3 slides");

        let error = CoreError::from(FormatError::InvalidAmount { input: "x".to_string() });
        assert_eq!(error.code(), ErrorCode::FormatError);
        assert_eq!(error.severity(), ErrorSeverity::Info);
        assert_eq!(error.to_string(), "Invalid amount: \"x\"");
    }

    #[test]
    fn test_severity_order() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
    }
}
