//! Error types for docket operations.
//!
//! Every failure carries a structured [`ErrorCode`] so the command-line shell
//! can print a stable code and a suggestion next to the message.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for docket operations.
pub type DocketResult<T> = Result<T, DocketError>;

/// Main error type for all docket operations.
#[derive(Error, Debug)]
pub enum DocketError {
    /// One or more required columns are absent from the whole dataset.
    #[error("Malformed input: missing required column(s): {}", missing.join(", "))]
    MalformedInput {
        missing: Vec<String>,
        code: ErrorCode,
    },

    /// The same ticket id appears more than once in a batch.
    #[error("Malformed input: duplicate ticket_id '{ticket_id}'")]
    DuplicateTicketId { ticket_id: String, code: ErrorCode },

    /// A `date_entered` value could not be converted to a timestamp.
    #[error("Unparseable timestamp '{value}' for ticket '{ticket_id}'")]
    UnparseableTimestamp {
        ticket_id: String,
        value: String,
        code: ErrorCode,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Completion provider failed (transport, status, or body).
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A similarity oracle call did not complete within its time budget.
    #[error("Oracle timed out after {}ms", timeout.as_millis())]
    OracleTimeout { timeout: Duration, code: ErrorCode },

    /// A similarity comparison failed while processing a partition.
    #[error("Oracle call failed in partition {partition} comparing '{parent_id}' with '{candidate_id}': {source}")]
    OracleCall {
        partition: String,
        parent_id: String,
        candidate_id: String,
        code: ErrorCode,
        #[source]
        source: Box<DocketError>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingColumn,
    ValDuplicateId,
    ValInvalidTimestamp,

    // LLM (LLM_xxx)
    LlmConnectionFailed,
    LlmGenerationFailed,
    LlmInvalidResponse,

    // Oracle (ORC_xxx)
    OrcCallFailed,
    OrcTimeout,

    // Parse (PARSE_xxx)
    ParseInvalidJson,
    ParseInvalidCsv,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingColumn => "VAL_002",
            ErrorCode::ValDuplicateId => "VAL_003",
            ErrorCode::ValInvalidTimestamp => "VAL_004",
            ErrorCode::LlmConnectionFailed => "LLM_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::OrcCallFailed => "ORC_001",
            ErrorCode::OrcTimeout => "ORC_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::ParseInvalidCsv => "PARSE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl DocketError {
    /// Create a malformed-input error for the given missing columns.
    pub fn malformed_input<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MalformedInput {
            missing: missing.into_iter().map(Into::into).collect(),
            code: ErrorCode::ValMissingColumn,
        }
    }

    /// Create a duplicate ticket id error.
    pub fn duplicate_ticket_id(ticket_id: impl Into<String>) -> Self {
        Self::DuplicateTicketId {
            ticket_id: ticket_id.into(),
            code: ErrorCode::ValDuplicateId,
        }
    }

    /// Create an unparseable timestamp error.
    pub fn unparseable_timestamp(ticket_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnparseableTimestamp {
            ticket_id: ticket_id.into(),
            value: value.into(),
            code: ErrorCode::ValInvalidTimestamp,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an LLM connection error that keeps its transport cause.
    pub fn llm_connection(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmConnectionFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Create an LLM error for a response that could not be interpreted.
    pub fn llm_invalid_response(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmInvalidResponse,
            source: None,
        }
    }

    /// Create an oracle timeout error.
    pub fn oracle_timeout(timeout: Duration) -> Self {
        Self::OracleTimeout {
            timeout,
            code: ErrorCode::OrcTimeout,
        }
    }

    /// Wrap a comparison failure with the partition and pair it happened on.
    pub fn oracle_call(
        partition: impl Into<String>,
        parent_id: impl Into<String>,
        candidate_id: impl Into<String>,
        source: DocketError,
    ) -> Self {
        Self::OracleCall {
            partition: partition.into(),
            parent_id: parent_id.into(),
            candidate_id: candidate_id.into(),
            code: ErrorCode::OrcCallFailed,
            source: Box::new(source),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedInput { code, .. } => *code,
            Self::DuplicateTicketId { code, .. } => *code,
            Self::UnparseableTimestamp { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Llm { code, .. } => *code,
            Self::OracleTimeout { code, .. } => *code,
            Self::OracleCall { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Configuration(_) | Self::UnsupportedProvider { .. } => ErrorCode::ValInvalidInput,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error came from the similarity oracle (directly or wrapped).
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            Self::Llm { .. } | Self::OracleTimeout { .. } | Self::OracleCall { .. }
        )
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { .. } => Some(
                "The export must include ticket_id, summary, customer_name, type, sub_type and date_entered columns",
            ),
            Self::DuplicateTicketId { .. } => {
                Some("Each ticket_id must appear once per export; remove repeated rows")
            }
            Self::UnparseableTimestamp { .. } => {
                Some("Use ISO 8601 (2024-05-01T09:30:00Z) or 'YYYY-MM-DD HH:MM:SS' timestamps")
            }
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Llm { .. } => Some("Please check your LLM provider configuration and API key"),
            Self::OracleTimeout { .. } => {
                Some("Increase oracle.timeout_secs or retry when the provider is less loaded")
            }
            Self::OracleCall { .. } => Some(
                "Retry the run, or pass --skip-failed-partitions to keep results from the other groups",
            ),
            Self::Configuration(_) => Some("Please check the configuration file and DOCKET_* variables"),
            _ => None,
        }
    }
}

impl From<csv::Error> for DocketError {
    fn from(err: csv::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            code: ErrorCode::ParseInvalidCsv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_lists_columns() {
        let err = DocketError::malformed_input(["summary", "sub_type"]);
        assert_eq!(err.code(), ErrorCode::ValMissingColumn);
        assert!(err.to_string().contains("summary, sub_type"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_oracle_call_wraps_source() {
        let inner = DocketError::oracle_timeout(Duration::from_secs(2));
        let err = DocketError::oracle_call("Acme/Network/Outage", "1", "2", inner);
        assert_eq!(err.code(), ErrorCode::OrcCallFailed);
        assert!(err.is_oracle_failure());
        assert!(err.to_string().contains("2000ms"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValMissingColumn.as_str(), "VAL_002");
        assert_eq!(ErrorCode::OrcTimeout.as_str(), "ORC_002");
    }

    #[test]
    fn test_validation_is_not_oracle_failure() {
        let err = DocketError::validation("bad threshold");
        assert!(!err.is_oracle_failure());
        assert!(err.suggestion().is_none());
    }
}
