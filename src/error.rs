//! Unified error types for geodiff.
//!
//! This module provides the error hierarchy for the library, with context
//! chaining for debugging and user-friendly messages. All failures are
//! terminal for a comparison run: there are no retries.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for geodiff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoDiffError {
    /// Malformed or unusable geometry
    #[error("Invalid geometry: {context}")]
    Geometry {
        context: String,
        #[source]
        source: GeometryErrorKind,
    },

    /// Errors while decoding a dataset file
    #[error("Failed to parse dataset: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while building or querying the spatial index
    #[error("Spatial index failure: {context}")]
    Index {
        context: String,
        #[source]
        source: IndexErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Output directory already holds files and overwriting was not requested
    #[error("Output directory {0:?} is not empty (use --force to overwrite)")]
    OutputExists(PathBuf),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific geometry error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeometryErrorKind {
    #[error("WKT parse error: {0}")]
    Wkt(String),

    #[error("geometry has no coordinates")]
    Empty,
}

/// Specific dataset parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Unknown field '{field}' in feature {seqno}")]
    UnknownField { field: String, seqno: usize },

    #[error("Field '{field}' expects {expected}, found {found} in feature {seqno}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
        seqno: usize,
    },

    #[error("Duplicate field '{0}' in schema")]
    DuplicateField(String),
}

/// Specific spatial index error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IndexErrorKind {
    #[error("record {seqno} could not be placed in the index")]
    InsertRejected { seqno: usize },

    #[error("Corrupt partition snapshot: {0}")]
    CorruptSnapshot(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for geodiff operations
pub type Result<T> = std::result::Result<T, GeoDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl GeoDiffError {
    /// Create a geometry error with context
    pub fn geometry(context: impl Into<String>, source: GeometryErrorKind) -> Self {
        Self::Geometry {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an index error with context
    pub fn index(context: impl Into<String>, source: IndexErrorKind) -> Self {
        Self::Index {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for GeoDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GeoDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
///
/// ```ignore
/// use geodiff::error::ErrorContext;
///
/// let dataset = parse_dataset_str(&content)
///     .with_context(|| format!("loading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<GeoDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: GeoDiffError, new_ctx: &str) -> GeoDiffError {
    match err {
        GeoDiffError::Geometry {
            context: existing,
            source,
        } => GeoDiffError::Geometry {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GeoDiffError::Parse {
            context: existing,
            source,
        } => GeoDiffError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GeoDiffError::Index {
            context: existing,
            source,
        } => GeoDiffError::Index {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GeoDiffError::Io {
            path,
            message,
            source,
        } => GeoDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        GeoDiffError::OutputExists(path) => GeoDiffError::OutputExists(path),
        GeoDiffError::Config(msg) => GeoDiffError::Config(chain_context(new_ctx, &msg)),
        GeoDiffError::Validation(msg) => GeoDiffError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| GeoDiffError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| GeoDiffError::Validation(f().into()))
    }
}
