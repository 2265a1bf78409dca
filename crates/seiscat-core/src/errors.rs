use seiscat_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using SeisCatError
pub type Result<T> = std::result::Result<T, SeisCatError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by the CLI, by log events and
/// by tests asserting on failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    /// Envelope has neither executable statements nor locator arguments
    NotDispatchable,
    /// Strict submission refused an envelope carrying validation warnings
    ValidationRejected,

    // History
    NotFound,
    /// Command is no longer pending (already merged, executed or failed)
    NotPending,
    EmptyMerge,

    // Persisted data
    /// Persisted command text is not well-formed JSON of the expected shape
    Parse,
    Serialization,

    // Store
    Persistence,
    /// A store-side operation returned a non-zero sentinel
    StatementFailed,
    UnknownStatement,

    // Locator
    ExternalProcess,

    // Integration/IO
    Io,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotDispatchable => "ERR_NOT_DISPATCHABLE",
            ExErrorKind::ValidationRejected => "ERR_VALIDATION_REJECTED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotPending => "ERR_NOT_PENDING",
            ExErrorKind::EmptyMerge => "ERR_EMPTY_MERGE",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::StatementFailed => "ERR_STATEMENT_FAILED",
            ExErrorKind::UnknownStatement => "ERR_UNKNOWN_STATEMENT",
            ExErrorKind::ExternalProcess => "ERR_EXTERNAL_PROCESS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context describing where the
/// failure happened (operation, history id, catalog target).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command_id: Option<i64>,
    target_id: Option<i64>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command_id: None,
            target_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add command history id context
    pub fn with_command_id(mut self, id: i64) -> Self {
        self.command_id = Some(id);
        self
    }

    /// Add catalog target id context (evid, hypid or phid)
    pub fn with_target_id(mut self, id: i64) -> Self {
        self.target_id = Some(id);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn command_id(&self) -> Option<i64> {
        self.command_id
    }

    pub fn target_id(&self) -> Option<i64> {
        self.target_id
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(command_id) = self.command_id {
            write!(f, " (command_id: {})", command_id)?;
        }
        if let Some(target_id) = self.target_id {
            write!(f, " (target_id: {})", target_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for command encoding, merging and rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeisCatError {
    /// Envelope carries no executable effect
    #[error("Command {command_type} on {target_id} has no statements and no locator arguments")]
    NotDispatchable {
        command_type: String,
        target_id: i64,
    },

    /// Strict submission refused a command with validation warnings
    #[error("Command rejected with {} validation warning(s): {}", warnings.len(), warnings.join("; "))]
    ValidationRejected { warnings: Vec<String> },

    /// Persisted command text could not be parsed
    #[error("Cannot parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Record could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Merge was requested with no usable sources
    #[error("Nothing to merge: none of the {selected} selected commands could be read")]
    EmptyMerge { selected: usize },

    /// Statement descriptor has the wrong parameters for its operation
    #[error("Statement {statement}: {reason}")]
    InvalidStatementParams { statement: String, reason: String },

    /// Statement names an operation the store does not provide
    #[error("Unknown statement: {name}")]
    UnknownStatement { name: String },

    /// Store-side operation returned a non-zero sentinel
    #[error("Statement {statement} returned sentinel {sentinel}")]
    StatementFailed { statement: String, sentinel: i64 },

    /// Catalog storage failed while running a statement
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Relocation process failed to start, read or exit cleanly
    #[error("Locator {program} failed: {message}")]
    ExternalProcess { program: String, message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for SeisCatError {
    fn from(err: serde_json::Error) -> Self {
        SeisCatError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from SeisCatError to ExError
impl From<SeisCatError> for ExError {
    fn from(err: SeisCatError) -> Self {
        let message = err.to_string();
        match err {
            SeisCatError::NotDispatchable { target_id, .. } => {
                ExError::new(ExErrorKind::NotDispatchable)
                    .with_target_id(target_id)
                    .with_message(message)
            }
            SeisCatError::ValidationRejected { .. } => {
                ExError::new(ExErrorKind::ValidationRejected).with_message(message)
            }
            SeisCatError::Parse { .. } => ExError::new(ExErrorKind::Parse).with_message(message),
            SeisCatError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            SeisCatError::EmptyMerge { .. } => {
                ExError::new(ExErrorKind::EmptyMerge).with_message(message)
            }
            SeisCatError::InvalidStatementParams { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            SeisCatError::UnknownStatement { .. } => {
                ExError::new(ExErrorKind::UnknownStatement).with_message(message)
            }
            SeisCatError::StatementFailed { .. } => {
                ExError::new(ExErrorKind::StatementFailed).with_message(message)
            }
            SeisCatError::Storage { .. } => {
                ExError::new(ExErrorKind::Persistence).with_message(message)
            }
            SeisCatError::ExternalProcess { .. } => {
                ExError::new(ExErrorKind::ExternalProcess).with_message(message)
            }
            SeisCatError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("load_command")
            .with_command_id(7)
            .with_message("Command not found");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_NOT_FOUND]"));
        assert!(text.contains("load_command"));
        assert!(text.contains("command_id: 7"));
    }

    #[test]
    fn test_statement_failed_maps_to_kind() {
        let err: ExError = SeisCatError::StatementFailed {
            statement: "set_prime".to_string(),
            sentinel: 1,
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::StatementFailed);
        assert_eq!(err.code(), "ERR_STATEMENT_FAILED");
        assert!(err.message().contains("sentinel 1"));
    }

    #[test]
    fn test_not_dispatchable_carries_target() {
        let err: ExError = SeisCatError::NotDispatchable {
            command_type: "hypocentreedit".to_string(),
            target_id: 42,
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::NotDispatchable);
        assert_eq!(err.target_id(), Some(42));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("broken pipe");
        let outer = ExError::new(ExErrorKind::ExternalProcess).with_source(inner);

        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }

    #[test]
    fn test_serde_error_converts_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: SeisCatError = err.into();
        assert!(matches!(converted, SeisCatError::Serialization { .. }));
    }
}
