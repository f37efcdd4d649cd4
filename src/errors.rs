//! Error types for the prospect pipeline
//!
//! Each error type has a corresponding error code for programmatic handling.

use thiserror::Error;

use crate::email::ReminderKind;
use crate::schemas::ProspectStatus;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error returned by the transition validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Illegal transition from {current} to {requested}")]
    IllegalTransition {
        current: ProspectStatus,
        requested: ProspectStatus,
    },
}

/// Failure reported by the email service collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email provider timed out")]
    Timeout,

    #[error("Email provider rejected the message: {0}")]
    Provider(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Main error type for all pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Requested status is not reachable from the current one
    #[error("Illegal transition from {current} to {requested}")]
    IllegalTransition {
        current: ProspectStatus,
        requested: ProspectStatus,
    },

    /// Operation attempted outside the status it requires
    #[error("Cannot {operation} while prospect is {actual} (requires {required})")]
    InvalidState {
        operation: &'static str,
        required: ProspectStatus,
        actual: ProspectStatus,
    },

    /// Missing or malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Optimistic write lost against another writer
    #[error(
        "Prospect {id} was modified concurrently (expected {expected} at version {expected_version}, found {actual} at version {actual_version})"
    )]
    ConcurrentModification {
        id: String,
        expected: ProspectStatus,
        actual: ProspectStatus,
        expected_version: u64,
        actual_version: u64,
    },

    #[error("{reminder} is not applicable while prospect is {status}")]
    ReminderNotApplicable {
        reminder: ReminderKind,
        status: ProspectStatus,
    },

    /// Notification failed; any committed transition stays committed
    #[error("Email delivery failed: {0}")]
    Email(#[from] EmailError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A prospect with email {email} already exists in fund {fund_id}")]
    DuplicateProspect { email: String, fund_id: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            PipelineError::InvalidState { .. } => "INVALID_STATE",
            PipelineError::Validation(_) => "VALIDATION",
            PipelineError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            PipelineError::ReminderNotApplicable { .. } => "REMINDER_NOT_APPLICABLE",
            PipelineError::Email(_) => "EMAIL_ERROR",
            PipelineError::NotFound(_) => "NOT_FOUND",
            PipelineError::DuplicateProspect { .. } => "DUPLICATE_PROSPECT",
            PipelineError::FileNotFound(_) => "FILE_NOT_FOUND",
            PipelineError::InvalidJson(_) => "INVALID_JSON",
            PipelineError::ConfigError(_) => "CONFIG_ERROR",
            PipelineError::Io(_) => "IO_ERROR",
        }
    }

    /// Business-rule violations and write conflicts the caller can act on.
    ///
    /// Storage and configuration failures are not recoverable here.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            PipelineError::FileNotFound(_)
                | PipelineError::InvalidJson(_)
                | PipelineError::ConfigError(_)
                | PipelineError::Io(_)
        )
    }
}

impl From<TransitionError> for PipelineError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::IllegalTransition { current, requested } => {
                PipelineError::IllegalTransition { current, requested }
            }
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &PipelineError) -> i32 {
    match error {
        PipelineError::Io(_) | PipelineError::ConfigError(_) | PipelineError::InvalidJson(_) => 2,
        PipelineError::ConcurrentModification { .. } => 75, // EX_TEMPFAIL: retry may succeed
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let illegal = PipelineError::IllegalTransition {
            current: ProspectStatus::KycSent,
            requested: ProspectStatus::Converted,
        };
        assert_eq!(illegal.code(), "ILLEGAL_TRANSITION");
        assert_eq!(PipelineError::Validation("x".into()).code(), "VALIDATION");
        assert_eq!(PipelineError::NotFound("p-1".into()).code(), "NOT_FOUND");
        assert_eq!(
            PipelineError::Email(EmailError::Timeout).code(),
            "EMAIL_ERROR"
        );
        assert_eq!(
            PipelineError::ReminderNotApplicable {
                reminder: ReminderKind::Kyc,
                status: ProspectStatus::Converted,
            }
            .code(),
            "REMINDER_NOT_APPLICABLE"
        );
    }

    #[test]
    fn test_transition_error_conversion_keeps_context() {
        let error: PipelineError = TransitionError::IllegalTransition {
            current: ProspectStatus::Converted,
            requested: ProspectStatus::NotEligible,
        }
        .into();

        match error {
            PipelineError::IllegalTransition { current, requested } => {
                assert_eq!(current, ProspectStatus::Converted);
                assert_eq!(requested, ProspectStatus::NotEligible);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_messages_name_statuses() {
        let error = PipelineError::InvalidState {
            operation: "approve documents",
            required: ProspectStatus::DocumentsPending,
            actual: ProspectStatus::DocumentsApproved,
        };
        let message = error.to_string();
        assert!(message.contains("documents_pending"));
        assert!(message.contains("documents_approved"));
    }

    #[test]
    fn test_conflict_message_names_versions() {
        let error = PipelineError::ConcurrentModification {
            id: "p-7".into(),
            expected: ProspectStatus::DocumentsPending,
            actual: ProspectStatus::DocumentsPending,
            expected_version: 9,
            actual_version: 11,
        };
        let message = error.to_string();
        assert!(message.contains("version 9"));
        assert!(message.contains("version 11"));
        assert_eq!(to_exit_code(&error), 75);
    }

    #[test]
    fn test_recoverability() {
        assert!(PipelineError::Email(EmailError::Timeout).is_recoverable());
        assert!(PipelineError::ConcurrentModification {
            id: "p-1".into(),
            expected: ProspectStatus::DocusignSigned,
            actual: ProspectStatus::Converted,
            expected_version: 11,
            actual_version: 12,
        }
        .is_recoverable());
        assert!(!PipelineError::ConfigError("bad".into()).is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(to_exit_code(&PipelineError::Validation("x".into())), 1);
        assert_eq!(to_exit_code(&PipelineError::ConfigError("x".into())), 2);
        assert_eq!(
            to_exit_code(&PipelineError::ConcurrentModification {
                id: "p-1".into(),
                expected: ProspectStatus::KycSent,
                actual: ProspectStatus::KycSubmitted,
                expected_version: 0,
                actual_version: 1,
            }),
            75
        );
    }
}
