//! Data-object error type.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use numerus_core::{ContentError, StructureError, ValidationError};
use numerus_dataml::DataMlError;

/// Errors raised by data-object operations.
#[derive(Debug)]
pub enum DataError {
    /// The requested structure is unusable.
    Structure(StructureError),
    /// Content could not be read or written.
    Content(ContentError),
    /// Validation against a requested structure failed.
    Validation(ValidationError),
    /// A DataML node could not be encoded or decoded.
    DataMl(DataMlError),
    /// A log file could not be opened or written.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The OS-level error.
        source: io::Error,
    },
    /// A generic structure string did not parse.
    GenericStructure {
        /// The full string.
        text: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A state node was malformed.
    BadState {
        /// What was wrong with it.
        detail: String,
    },
    /// A file-backed log was configured without a file name.
    NoLogFile,
    /// The logged byte count disagrees with the samples recorded.
    LogByteCount {
        /// `count × bytes_total`.
        expected: usize,
        /// Bytes held by the log.
        actual: usize,
    },
}

impl DataError {
    pub(crate) fn io_at(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn generic(text: &str, reason: impl Into<String>) -> Self {
        Self::GenericStructure {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure(e) => write!(f, "{e}"),
            Self::Content(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::DataMl(e) => write!(f, "{e}"),
            Self::Io { path, source } => {
                write!(f, "failed to access file \"{}\": {source}", path.display())
            }
            Self::GenericStructure { text, reason } => {
                write!(f, "invalid structure string \"{text}\" ({reason})")
            }
            Self::BadState { detail } => write!(f, "invalid state ({detail})"),
            Self::NoLogFile => write!(f, "log is not encapsulated but no file name was given"),
            Self::LogByteCount { expected, actual } => write!(
                f,
                "wrong byte count while storing ({actual} instead of {expected})"
            ),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Structure(e) => Some(e),
            Self::Content(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::DataMl(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StructureError> for DataError {
    fn from(e: StructureError) -> Self {
        Self::Structure(e)
    }
}

impl From<ContentError> for DataError {
    fn from(e: ContentError) -> Self {
        Self::Content(e)
    }
}

impl From<ValidationError> for DataError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DataMlError> for DataError {
    fn from(e: DataMlError) -> Self {
        Self::DataMl(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_chains() {
        let e = DataError::from(ContentError::CapacityExceeded {
            count: 5,
            capacity: 4,
        });
        assert_eq!(
            e.to_string(),
            "too many items supplied (5 is more than previously set capacity of 4)"
        );
        assert!(e.source().is_some());

        let g = DataError::generic("DOUBLE/REAL", "wrong part count");
        assert_eq!(
            g.to_string(),
            "invalid structure string \"DOUBLE/REAL\" (wrong part count)"
        );
        assert!(g.source().is_none());
    }
}
