//! Error types for spendboard-core
//!
//! Every failure of an upstream page fetch ends up here. The aggregator
//! wraps fetch failures in [`CoreError::PageFetch`] so callers can tell
//! which page of a sweep broke.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Upstream answered with a non-success status
    UpstreamStatus,
    /// Upstream body could not be decoded
    UpstreamBody,
    /// Upstream could not be reached
    UpstreamUnreachable,
    /// A page of a sweep failed
    PageFetch,
    /// The sweep ran past its deadline
    DeadlineExceeded,
    /// Validation error
    ValidationError,
    /// CSV encode/decode error
    CsvError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::UpstreamStatus => write!(f, "UPSTREAM_STATUS"),
            ErrorCode::UpstreamBody => write!(f, "UPSTREAM_BODY"),
            ErrorCode::UpstreamUnreachable => write!(f, "UPSTREAM_UNREACHABLE"),
            ErrorCode::PageFetch => write!(f, "PAGE_FETCH"),
            ErrorCode::DeadlineExceeded => write!(f, "DEADLINE_EXCEEDED"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::CsvError => write!(f, "CSV_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for spendboard-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Upstream body is malformed: {message}")]
    UpstreamBody { message: String },

    #[error("Upstream unreachable: {message}")]
    UpstreamUnreachable { message: String },

    #[error("Failed to fetch page {page}: {source}")]
    PageFetch {
        page: u32,
        source: Box<CoreError>,
    },

    #[error("Aggregation did not finish within {seconds}s")]
    DeadlineExceeded { seconds: u64 },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("CSV error: {message}")]
    Csv { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::UpstreamStatus { .. } => ErrorCode::UpstreamStatus,
            CoreError::UpstreamBody { .. } => ErrorCode::UpstreamBody,
            CoreError::UpstreamUnreachable { .. } => ErrorCode::UpstreamUnreachable,
            CoreError::PageFetch { .. } => ErrorCode::PageFetch,
            CoreError::DeadlineExceeded { .. } => ErrorCode::DeadlineExceeded,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::Csv { .. } => ErrorCode::CsvError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Page index of a failed sweep, if this error came from one
    pub fn failed_page(&self) -> Option<u32> {
        match self {
            CoreError::PageFetch { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// True when the failure originated at an upstream source
    pub fn is_upstream(&self) -> bool {
        match self {
            CoreError::UpstreamStatus { .. }
            | CoreError::UpstreamBody { .. }
            | CoreError::UpstreamUnreachable { .. }
            | CoreError::DeadlineExceeded { .. } => true,
            CoreError::PageFetch { source, .. } => source.is_upstream(),
            _ => false,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<csv::Error> for CoreError {
    fn from(error: csv::Error) -> Self {
        CoreError::Csv { message: error.to_string() }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "spendboard::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "spendboard::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
        }
    }
}
