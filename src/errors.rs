//! Error types for the deserialization core

use thiserror::Error;

/// Errors that can occur while detecting a format or building a model
#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    /// Raised by a detection pipe when the input does not match the
    /// dialect it was built for. Recovered by the dispatcher, which
    /// tries the next registered strategy.
    #[error("unsupported format: {reason}")]
    UnsupportedFormat {
        /// Why the detector rejected the input
        reason: String,
    },

    /// A structural or encoding violation: well-formed input but a
    /// mandatory attribute is missing, the underlying XML/JSON failed
    /// to parse, or an enum value could not be mapped.
    #[error("invalid format at {location}: {message}")]
    InvalidFormat {
        /// Human-readable description of the violation
        message: String,
        /// Best-effort location (tag name, JSON pointer, file path)
        location: String,
    },

    /// A `ConfigProxy`/`ConfigPath` resolved against a `ConfigNamespace`
    /// that does not carry the expected key. Programmer error, not a
    /// data error; never caught internally.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// More than one registered strategy accepted the same data source.
    #[error("ambiguous format: {candidates:?} all claim this source")]
    AmbiguousFormat {
        /// Names of the strategies that all accepted the input
        candidates: Vec<String>,
    },

    /// Two distinct entities registered under the same id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// After `flush(strict)`, at least one deferred reference remained
    /// unresolved.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    /// No strategy in the registry accepts the source at all.
    #[error("no strategy can deserialize this source")]
    NoStrategyAvailable,

    /// I/O failure while reading a file-backed `DataSource`.
    #[error("io error reading {path}: {message}")]
    Io {
        /// Path that failed to read
        path: String,
        /// Underlying OS error message
        message: String,
    },
}

/// Result type for deserialization-core operations
pub type TranslationResult<T> = Result<T, TranslationError>;

impl From<serde_json::Error> for TranslationError {
    fn from(err: serde_json::Error) -> Self {
        TranslationError::InvalidFormat {
            message: err.to_string(),
            location: format!("line {}, column {}", err.line(), err.column()),
        }
    }
}

impl From<roxmltree::Error> for TranslationError {
    fn from(err: roxmltree::Error) -> Self {
        TranslationError::InvalidFormat {
            message: err.to_string(),
            location: "xml document".to_string(),
        }
    }
}

impl TranslationError {
    /// Build an `InvalidFormat` at a given location
    pub fn invalid_format(message: impl Into<String>, location: impl Into<String>) -> Self {
        TranslationError::InvalidFormat {
            message: message.into(),
            location: location.into(),
        }
    }

    /// Build an `UnsupportedFormat`
    pub fn unsupported(reason: impl Into<String>) -> Self {
        TranslationError::UnsupportedFormat {
            reason: reason.into(),
        }
    }

    /// True for the one error kind the strategy dispatcher is allowed
    /// to recover from by trying the next strategy.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, TranslationError::UnsupportedFormat { .. })
    }

    /// True for errors that indicate malformed (not merely foreign) input.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, TranslationError::InvalidFormat { .. })
    }

    /// True for errors that are programmer mistakes rather than bad data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, TranslationError::Configuration(_))
    }
}
