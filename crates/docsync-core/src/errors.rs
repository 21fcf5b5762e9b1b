use docsync_core_types::RunId;
use thiserror::Error;

/// Result type alias using DocSyncError
pub type Result<T> = std::result::Result<T, DocSyncError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in docsync. Each kind maps to a stable error code that can be used for
/// programmatic error handling, testing, and CI log scraping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Documents
    /// A document on disk is not valid YAML or has an unexpected shape
    Parse,
    /// A dirty document could not be flushed to disk
    Write,
    /// An undocumented entity has no usable source path for stub placement
    Routing,
    /// Two documents define the same entity name and collisions are rejected
    DuplicateEntity,
    /// An edit cannot be spliced into a document without disturbing other lines
    Uneditable,

    // Inputs
    InvalidInput,
    InvalidMode,
    InvalidCatalog,
    NotFound,
    Config,

    // Interaction
    Prompt,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Write => "ERR_WRITE",
            ExErrorKind::Routing => "ERR_ROUTING",
            ExErrorKind::DuplicateEntity => "ERR_DUPLICATE_ENTITY",
            ExErrorKind::Uneditable => "ERR_UNEDITABLE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidMode => "ERR_INVALID_MODE",
            ExErrorKind::InvalidCatalog => "ERR_INVALID_CATALOG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Prompt => "ERR_PROMPT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    path: Option<String>,
    field: Option<String>,
    run_id: Option<RunId>,
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
            field: None,
            run_id: None,
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

    /// Add field key context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
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

    /// Get the field key context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
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
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
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
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for docsync domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocSyncError {
    // ===== Document Errors =====
    /// A document could not be parsed; aborts the whole scan
    #[error("Failed to parse document {path}: {message}")]
    Parse { path: String, message: String },

    /// A single document could not be written; the flush continues
    #[error("Failed to write document {path}: {message}")]
    Write { path: String, message: String },

    /// An undocumented entity has no source path hint to place a stub next to
    #[error("Cannot create stub for '{entity}': missing source file hint")]
    Routing { entity: String },

    /// Two documents define the same entity and collisions are rejected
    #[error("Entity '{entity}' is defined in both {first_path} and {second_path}")]
    DuplicateEntity {
        entity: String,
        first_path: String,
        second_path: String,
    },

    /// An edit would require re-rendering untouched parts of a document
    #[error("Cannot edit document {path} in place: {message}")]
    Uneditable { path: String, message: String },

    // ===== Input Errors =====
    /// Mode string is not one of update/check/interactive/drift
    #[error("Invalid mode: {value} (expected update, check, interactive or drift)")]
    InvalidMode { value: String },

    /// Catalog payload is malformed
    #[error("Invalid catalog: {message}")]
    InvalidCatalog { message: String },

    /// Generic invalid argument
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Settings file is malformed
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    // ===== Interaction Errors =====
    /// Terminal prompt could not be read or written
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // ===== Generic Errors =====
    /// Filesystem error outside the flush loop
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Serialization error (JSON/YAML encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from DocSyncError to ExError
///
/// Lets domain errors raised in `docsync-core` flow through the `ExError`
/// results used by the store and engine layers with `?`.
impl From<DocSyncError> for ExError {
    fn from(err: DocSyncError) -> Self {
        match err {
            DocSyncError::Parse { path, message } => ExError::new(ExErrorKind::Parse)
                .with_op("parse_document")
                .with_path(path)
                .with_message(message),

            DocSyncError::Write { path, message } => ExError::new(ExErrorKind::Write)
                .with_op("flush_document")
                .with_path(path)
                .with_message(message),

            DocSyncError::Routing { entity } => ExError::new(ExErrorKind::Routing)
                .with_op("create_stub")
                .with_entity(entity)
                .with_message("Missing source file hint"),

            DocSyncError::DuplicateEntity {
                entity,
                first_path,
                second_path,
            } => ExError::new(ExErrorKind::DuplicateEntity)
                .with_op("scan")
                .with_entity(entity)
                .with_path(second_path)
                .with_message(format!("Entity already defined in {}", first_path)),

            DocSyncError::Uneditable { path, message } => ExError::new(ExErrorKind::Uneditable)
                .with_op("edit_document")
                .with_path(path)
                .with_message(message),

            DocSyncError::InvalidMode { value } => ExError::new(ExErrorKind::InvalidMode)
                .with_message(format!("Unknown mode '{}'", value)),

            DocSyncError::InvalidCatalog { message } => {
                ExError::new(ExErrorKind::InvalidCatalog).with_message(message)
            }

            DocSyncError::InvalidInput { message } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            DocSyncError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }

            DocSyncError::Prompt { message } => ExError::new(ExErrorKind::Prompt)
                .with_op("prompt")
                .with_message(message),

            DocSyncError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),

            DocSyncError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            DocSyncError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DocSyncError
impl From<serde_json::Error> for DocSyncError {
    fn from(err: serde_json::Error) -> Self {
        DocSyncError::Serialization {
            message: err.to_string(),
        }
    }
}
