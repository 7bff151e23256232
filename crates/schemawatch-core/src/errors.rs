/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure in schemawatch is classified by one of these kinds. Each
/// kind maps to a stable error code used in logs, JSON output and tests.
///
/// Per-entity kinds (`MalformedDocument`, `EntityFetchFailure`,
/// `EntityNotFound`) are absorbed by the aggregator and never end a run.
/// Store and configuration kinds are fatal and map to a dedicated exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Per-entity (absorbed)
    /// Entity document is not a mapping at the top level
    MalformedDocument,
    /// Network or remote error while fetching one entity
    EntityFetchFailure,
    /// The catalog does not know the entity
    EntityNotFound,

    // Baseline
    /// No baseline exists at the configured path
    BaselineNotFound,
    /// Baseline file is not valid JSON or lacks required fields
    BaselineCorrupt,

    // Structural/Validation
    InvalidInput,
    /// The computed change report failed its JSON round-trip check
    DeterminismViolation,

    // Integration/IO
    Io,
    Serialization,
    ExternalService,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedDocument => "ERR_MALFORMED_DOCUMENT",
            ExErrorKind::EntityFetchFailure => "ERR_ENTITY_FETCH_FAILURE",
            ExErrorKind::EntityNotFound => "ERR_ENTITY_NOT_FOUND",
            ExErrorKind::BaselineNotFound => "ERR_BASELINE_NOT_FOUND",
            ExErrorKind::BaselineCorrupt => "ERR_BASELINE_CORRUPT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds that only affect a single sampled entity
    pub fn is_per_entity(&self) -> bool {
        matches!(
            self,
            ExErrorKind::MalformedDocument
                | ExErrorKind::EntityFetchFailure
                | ExErrorKind::EntityNotFound
                | ExErrorKind::Timeout
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context (operation, entity name,
/// file path) for logs and user-facing messages.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity name context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
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

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity name context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
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
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
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

/// Conversion from serde_json::Error
impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
