//! Error types for csuite-onboard
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - The failing role and beam step for selection failures
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::persona::Role;

/// Result type alias for onboarding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Input errors (3xx)
    InvalidAnswer = 300,
    InvalidProfile = 301,
    SessionParseError = 302,
    LibraryInvalid = 303,

    // Selection errors (4xx)
    NoCandidates = 400,
    VetoExhausted = 401,
    DuplicateRole = 402,
    EmptyBeam = 403,

    // Lunar computation errors (5xx)
    InvalidLeapMonth = 500,
    InvalidDate = 501,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────

    /// A survey answer is outside its ordinal scale
    #[error("Answer for {question} must be between {min} and {max}, got {value}")]
    InvalidAnswer {
        question: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A profile value could not be interpreted
    #[error("Invalid {field}: {message}")]
    InvalidProfile { field: String, message: String },

    /// Session answers file could not be parsed
    #[error("Failed to parse session file {path}: {message}")]
    SessionParse { path: PathBuf, message: String },

    /// Persona catalog is malformed
    #[error("Invalid persona library: {message}")]
    LibraryInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Selection Errors
    // ─────────────────────────────────────────────────────────────

    /// A role in the ordering has no library candidates
    #[error("No candidates for role {role} (step {step})")]
    NoCandidates { role: Role, step: usize },

    /// Every CEO candidate failed the pleasantness gate
    #[error("No candidate satisfies the requested vibe constraints for role {role} (step {step})")]
    VetoExhausted { role: Role, step: usize },

    /// An assignment already holds this role
    #[error("Role {role} is already assigned")]
    DuplicateRole { role: Role },

    /// Selection finished without any complete assignment
    #[error("Beam is empty; no assignment to finalize")]
    EmptyBeam,

    // ─────────────────────────────────────────────────────────────
    // Lunar Errors
    // ─────────────────────────────────────────────────────────────

    /// Inconsistent leap-month request
    #[error("Invalid lunar leap month {month} for lunar year {year}")]
    InvalidLeapMonth { month: u32, year: i32 },

    /// Julian day did not map to a Gregorian date
    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { source, .. } => io_code(source, ErrorCode::IoRead),
            Error::IoWrite { source, .. } => io_code(source, ErrorCode::IoWrite),
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::InternalError,

            Error::InvalidAnswer { .. } => ErrorCode::InvalidAnswer,
            Error::InvalidProfile { .. } => ErrorCode::InvalidProfile,
            Error::SessionParse { .. } => ErrorCode::SessionParseError,
            Error::LibraryInvalid { .. } => ErrorCode::LibraryInvalid,

            Error::NoCandidates { .. } => ErrorCode::NoCandidates,
            Error::VetoExhausted { .. } => ErrorCode::VetoExhausted,
            Error::DuplicateRole { .. } => ErrorCode::DuplicateRole,
            Error::EmptyBeam => ErrorCode::EmptyBeam,

            Error::InvalidLeapMonth { .. } => ErrorCode::InvalidLeapMonth,
            Error::InvalidDate(_) => ErrorCode::InvalidDate,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Role and step at which a selection run failed, if any
    pub fn failed_step(&self) -> Option<(Role, usize)> {
        match self {
            Error::NoCandidates { role, step } | Error::VetoExhausted { role, step } => {
                Some((*role, *step))
            }
            _ => None,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'csuite-onboard config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'csuite-onboard config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::InvalidAnswer { .. } => Some(
                "Survey answers use a 1-5 scale (1 = strongly disagree, 5 = strongly agree)."
            ),
            Error::SessionParse { .. } => Some(
                "Compare your session file with tests/fixtures/session.toml."
            ),
            Error::LibraryInvalid { .. } => Some(
                "Every persona needs an id, a role, an enneagram core in 1-9, a 4-letter MBTI code and a weight in [0,1]."
            ),
            Error::NoCandidates { .. } => Some(
                "Add at least one persona for this role to the library, or remove the role from the ordering."
            ),
            Error::VetoExhausted { .. } => Some(
                "Relax the CEO pleasantness setting (use 3) or add a CEO persona matching it."
            ),
            Error::IoRead { source, .. } | Error::IoWrite { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                Some("Check the file permissions, or pick a path you can write to.")
            }
            Error::InvalidLeapMonth { .. } | Error::InvalidDate(_) => Some(
                "This is a lunar computation fault; please report the input date."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

/// Missing files and permission failures get their own codes.
fn io_code(source: &std::io::Error, fallback: ErrorCode) -> ErrorCode {
    match source.kind() {
        std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
        std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
        _ => fallback,
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an invalid profile error
    pub fn invalid_profile(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidProfile {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a library validation error
    pub fn library_invalid(message: impl Into<String>) -> Self {
        Error::LibraryInvalid {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::NoCandidates.as_str(), "E400");
        assert_eq!(ErrorCode::InvalidLeapMonth.as_str(), "E500");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::InvalidAnswer.exit_code(), 30);
        assert_eq!(ErrorCode::VetoExhausted.exit_code(), 40);
        assert_eq!(ErrorCode::InvalidDate.exit_code(), 50);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_selection_errors_report_step() {
        let err = Error::VetoExhausted { role: Role::Ceo, step: 0 };
        assert_eq!(err.failed_step(), Some((Role::Ceo, 0)));
        assert!(err.to_string().contains("vibe constraints"));
        assert!(err.to_string().contains("CEO"));

        let err = Error::NoCandidates { role: Role::Cxa, step: 8 };
        assert_eq!(err.code(), ErrorCode::NoCandidates);
        assert!(err.to_string().contains("No candidates for role CXA"));

        assert!(Error::EmptyBeam.failed_step().is_none());
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::VetoExhausted { role: Role::Ceo, step: 0 };
        assert!(err.suggestion().unwrap().contains("pleasantness"));

        let err = Error::config_validation("bad");
        assert!(err.suggestion().unwrap().contains("configuration"));

        assert!(Error::EmptyBeam.suggestion().is_none());
    }

    #[test]
    fn test_io_errors_classified_by_kind() {
        let io = |kind| std::io::Error::new(kind, "boom");
        let path = PathBuf::from("/tmp/onboard.toml");

        let missing = Error::IoRead { path: path.clone(), source: io(std::io::ErrorKind::NotFound) };
        assert_eq!(missing.code(), ErrorCode::IoNotFound);

        let denied = Error::IoWrite { path: path.clone(), source: io(std::io::ErrorKind::PermissionDenied) };
        assert_eq!(denied.code(), ErrorCode::IoPermission);
        assert_eq!(denied.exit_code(), 20);
        assert!(denied.suggestion().unwrap().contains("permissions"));

        let other = Error::IoWrite { path, source: io(std::io::ErrorKind::Other) };
        assert_eq!(other.code(), ErrorCode::IoWrite);
        assert!(other.suggestion().is_none());
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::ConfigNotFound { path: PathBuf::from("/test/config.toml") };
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E100"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let err = Error::InvalidLeapMonth { month: 4, year: 2023 };
        let formatted = err.format_for_log();

        assert!(formatted.contains("[E500]"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert_eq!(err.code(), ErrorCode::IoNotFound);
    }
}
