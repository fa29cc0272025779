//! Error types for pretalab-core
//!
//! Store operations return [`StoreError`], an explicit discriminated result the
//! HTTP layer matches on to pick a status code. Schema validation collects every
//! failing field into [`ValidationErrors`] before anything is persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RecordKind;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Identifier token is not a well-formed record id
    MalformedId,
    /// Well-formed id with no matching document
    NotFound,
    /// Document failed schema validation
    ValidationError,
    /// Store unavailable or any other failure
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::MalformedId => write!(f, "MALFORMED_ID"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational - caller error, nothing wrong server side
    Info,
    /// Warning - operation rejected
    Warning,
    /// Error - operation failed
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

/// A single field-level constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path (e.g. "title")
    pub path: String,
    /// Human-readable explanation
    pub message: String,
}

impl FieldError {
    pub fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All field violations for one write attempt, in schema field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Collect the failures out of a set of field results
    pub fn from_failures<I>(failures: I) -> Self
    where
        I: IntoIterator<Item = Option<FieldError>>,
    {
        Self {
            errors: failures.into_iter().flatten().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a rejected insert: "Task validation failed: title: ..."
    pub fn create_message(&self, kind: RecordKind) -> String {
        format!("{} validation failed: {}", kind.name(), self.joined())
    }

    /// Message for a rejected update: "Validation failed: title: ..."
    pub fn update_message(&self) -> String {
        format!("Validation failed: {}", self.joined())
    }

    fn joined(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Outcome of a failed document store operation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Malformed identifier: {token}")]
    MalformedId { token: String },

    #[error("Document not found: {id}")]
    NotFound { id: String },

    #[error("{message}")]
    ValidationFailed {
        message: String,
        errors: ValidationErrors,
    },

    #[error("Unexpected store error: {detail}")]
    Unexpected { detail: String },
}

impl StoreError {
    pub fn malformed_id(token: &str) -> Self {
        StoreError::MalformedId {
            token: token.to_string(),
        }
    }

    pub fn not_found(id: impl ToString) -> Self {
        StoreError::NotFound { id: id.to_string() }
    }

    pub fn unexpected(detail: impl ToString) -> Self {
        StoreError::Unexpected {
            detail: detail.to_string(),
        }
    }

    /// Validation failure on insert
    pub fn invalid_create(kind: RecordKind, errors: ValidationErrors) -> Self {
        StoreError::ValidationFailed {
            message: errors.create_message(kind),
            errors,
        }
    }

    /// Validation failure on update
    pub fn invalid_update(errors: ValidationErrors) -> Self {
        StoreError::ValidationFailed {
            message: errors.update_message(),
            errors,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::MalformedId { .. } => ErrorCode::MalformedId,
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::ValidationFailed { .. } => ErrorCode::ValidationError,
            StoreError::Unexpected { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::MalformedId { .. } => ErrorSeverity::Info,
            StoreError::NotFound { .. } => ErrorSeverity::Info,
            StoreError::ValidationFailed { .. } => ErrorSeverity::Warning,
            StoreError::Unexpected { .. } => ErrorSeverity::Error,
        }
    }

    /// Log this error at the level matching its severity
    pub fn log(&self, operation: &str) {
        match self.severity() {
            ErrorSeverity::Info => log::debug!(
                target: "pretalab::store",
                "[{}] {} - Operation: {}",
                self.code(),
                self,
                operation
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "pretalab::store",
                "[{}] {} - Operation: {}",
                self.code(),
                self,
                operation
            ),
            ErrorSeverity::Error => log::error!(
                target: "pretalab::store",
                "[{}] {} - Operation: {}",
                self.code(),
                self,
                operation
            ),
        }
    }
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn two_errors() -> ValidationErrors {
        ValidationErrors::from_failures([
            Some(FieldError::new("description", "A descrição da transação é obrigatória.")),
            None,
            Some(FieldError::new("date", "A data da transação é obrigatória.")),
        ])
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::MalformedId.to_string(), "MALFORMED_ID");
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCode::InternalError.to_string(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_from_failures_skips_passing_fields() {
        let errors = two_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors[0].path, "description");
        assert_eq!(errors.errors[1].path, "date");
    }

    #[test]
    fn test_create_message_joins_every_field() {
        let message = two_errors().create_message(RecordKind::Transaction);
        assert_eq!(
            message,
            "Transaction validation failed: description: A descrição da transação é obrigatória., \
             date: A data da transação é obrigatória."
        );
    }

    #[test]
    fn test_update_message() {
        let errors = ValidationErrors::from_failures([Some(FieldError::new(
            "title",
            "O título da tarefa é obrigatório.",
        ))]);
        assert_eq!(
            errors.update_message(),
            "Validation failed: title: O título da tarefa é obrigatório."
        );
    }

    #[test]
    fn test_store_error_code_and_severity() {
        let error = StoreError::malformed_id("123");
        assert_eq!(error.code(), ErrorCode::MalformedId);
        assert_eq!(error.severity(), ErrorSeverity::Info);

        let error = StoreError::invalid_create(RecordKind::Task, two_errors());
        assert_eq!(error.code(), ErrorCode::ValidationError);
        assert!(error.to_string().starts_with("Task validation failed: "));

        let error = StoreError::unexpected("connection refused");
        assert_eq!(error.severity(), ErrorSeverity::Error);
        assert!(error.to_string().contains("connection refused"));
    }
}
