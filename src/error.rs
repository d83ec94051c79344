/// Centralized error types for the banking calendar
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankdayError {
    // Argument Errors
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // Holiday Table Errors
    #[error("Invalid holiday rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },

    // Advancement Errors
    #[error("No banking day found for count {count} within {limit} calendar days")]
    WalkLimitExceeded { limit: u32, count: u32 },

    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // File I/O Errors
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BankdayError>;

impl BankdayError {
    /// Errors caused by caller input rather than by a broken calendar
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            BankdayError::InvalidParameter(_) | BankdayError::ConfigError(_)
        )
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            BankdayError::InvalidParameter(_) => "ARG_001",
            BankdayError::InvalidRule { .. } => "RULE_001",
            BankdayError::WalkLimitExceeded { .. } => "WALK_001",
            BankdayError::ConfigError(_) => "CFG_001",
            BankdayError::FileError(_) => "FILE_001",
        }
    }
}
