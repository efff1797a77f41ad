//! Error types for decoding, binding and loading.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::validate::ValidationErrors;
use crate::Value;

/// Errors that abort a [`Loader::load`](crate::Loader::load) call.
///
/// Every variant except [`LoadError::Validation`] identifies the offending
/// pattern or path.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A format was registered under an extension that is neither empty nor
    /// starts with `.`.
    #[error("format extension \"{extension}\" must be empty or start with '.'")]
    InvalidExtension {
        /// The rejected extension.
        extension: String,
    },

    /// A configuration path pattern is not valid glob syntax.
    #[error("failed to expand configuration path \"{pattern}\": {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// A path matched by a pattern could not be inspected.
    #[error("failed to stat configuration path {path}: {source}")]
    Stat {
        /// The path that could not be inspected.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path matched by a pattern is a directory.
    #[error("configuration path {path} is a directory, expected a file")]
    IsDirectory {
        /// The directory path.
        path: PathBuf,
    },

    /// A configuration file could not be opened for reading.
    #[error("failed to open configuration file {path}: {source}")]
    Open {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A registered decoder rejected a file's contents.
    #[error("failed to decode configuration file {path}: {source}")]
    Decode {
        /// Path to the file.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: DecodeError,
    },

    /// Decoded data does not fit the destination record.
    #[error("failed to bind configuration file {path}: {source}")]
    Bind {
        /// Path to the file.
        path: PathBuf,
        /// Underlying binding error.
        #[source]
        source: BindError,
    },

    /// A declared default literal does not fit its field.
    #[error("failed to apply default values: {source}")]
    Defaults {
        /// Underlying binding error.
        #[source]
        source: BindError,
    },

    /// One or more fields violate their declared constraints.
    #[error("configuration validation failed: {0}")]
    Validation(ValidationErrors),
}

impl LoadError {
    /// Create a new invalid extension error.
    pub fn invalid_extension(extension: impl Into<String>) -> Self {
        Self::InvalidExtension {
            extension: extension.into(),
        }
    }

    /// Create a new pattern error.
    pub fn pattern(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new stat error.
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Create a new directory rejection error.
    pub fn is_directory(path: impl Into<PathBuf>) -> Self {
        Self::IsDirectory { path: path.into() }
    }

    /// Create a new open error.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a new decode error.
    pub fn decode(path: impl Into<PathBuf>, source: DecodeError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Create a new bind error.
    pub fn bind(path: impl Into<PathBuf>, source: BindError) -> Self {
        Self::Bind {
            path: path.into(),
            source,
        }
    }

    /// Create a new defaults error.
    pub fn defaults(source: BindError) -> Self {
        Self::Defaults { source }
    }

    /// The file or directory this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stat { path, .. }
            | Self::IsDirectory { path }
            | Self::Open { path, .. }
            | Self::Decode { path, .. }
            | Self::Bind { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The validation failures, if this is a validation error.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Errors produced by a [`MapDecoder`](crate::MapDecoder).
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Reading the input stream failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax error.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML syntax error.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax error.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document root is not a map.
    #[error("document root must be a map, found {found}")]
    NotAMap {
        /// Kind of the root value.
        found: &'static str,
    },

    /// A map key cannot be represented as a string.
    #[error("unsupported map key: {key}")]
    UnsupportedKey {
        /// Debug rendering of the key.
        key: String,
    },

    /// Error raised by a third-party decoder.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl DecodeError {
    /// Wrap an arbitrary decoder error.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }
}

/// Why a value could not be bound to a field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindErrorKind {
    /// The value's kind does not match the field's type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the field accepts.
        expected: &'static str,
        /// Kind that was supplied.
        found: &'static str,
    },

    /// An integer does not fit the field's numeric type.
    #[error("value {value} is out of range for {target}")]
    OutOfRange {
        /// The supplied value.
        value: String,
        /// The target type.
        target: &'static str,
    },

    /// Any other rejection.
    #[error("{0}")]
    Invalid(String),
}

/// A value could not be coerced into its destination field.
///
/// Carries the dotted key path of the offending value, e.g.
/// `database.replicas[1].port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    path: String,
    kind: BindErrorKind,
}

impl BindError {
    /// Create a new error with an empty path.
    pub fn new(kind: BindErrorKind) -> Self {
        Self {
            path: String::new(),
            kind,
        }
    }

    /// Create a type mismatch error for `found`.
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self::new(BindErrorKind::TypeMismatch {
            expected,
            found: found.type_name(),
        })
    }

    /// Create an out of range error.
    pub fn out_of_range(value: impl fmt::Display, target: &'static str) -> Self {
        Self::new(BindErrorKind::OutOfRange {
            value: value.to_string(),
            target,
        })
    }

    /// Create a free-form error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(BindErrorKind::Invalid(message.into()))
    }

    /// Prefix the path with a map key.
    #[must_use]
    pub fn at(mut self, key: &str) -> Self {
        self.path = if self.path.is_empty() {
            key.to_string()
        } else if self.path.starts_with('[') {
            format!("{key}{}", self.path)
        } else {
            format!("{key}.{}", self.path)
        };
        self
    }

    /// Prefix the path with a sequence index.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.path = if self.path.is_empty() || self.path.starts_with('[') {
            format!("[{index}]{}", self.path)
        } else {
            format!("[{index}].{}", self.path)
        };
        self
    }

    /// Dotted key path of the offending value. Empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Why binding failed.
    pub fn kind(&self) -> &BindErrorKind {
        &self.kind
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for BindError {}
