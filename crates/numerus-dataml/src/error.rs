//! Error types for the DataML codec.

use std::fmt;
use std::io;
use std::path::PathBuf;

use numerus_core::{ElementKind, StructureError, ValidationError};

/// Errors raised while reading or writing DataML nodes.
///
/// Every variant that concerns a node carries its element name so the
/// message identifies where in a document the problem is.
#[derive(Debug)]
pub enum DataMlError {
    /// File I/O failed.
    Io {
        /// The file involved, if known.
        path: Option<PathBuf>,
        /// The OS-level error.
        source: io::Error,
    },
    /// The node's structure is unusable.
    Structure {
        /// Node name.
        node: String,
        /// The underlying error.
        source: StructureError,
    },
    /// Validation against a requested structure failed.
    Validation(ValidationError),
    /// The `c` attribute is not a known class code.
    BadClass {
        /// Node name.
        node: String,
        /// Attribute value.
        class: String,
    },
    /// The `s` attribute is not a known storage modifier.
    BadStorage {
        /// Node name.
        node: String,
        /// Attribute value.
        value: String,
    },
    /// The node holds struct, cell or otherwise non-fillable data.
    CannotFill {
        /// Node name.
        node: String,
    },
    /// A numeric token did not parse.
    MalformedToken {
        /// Node name.
        node: String,
        /// The offending token.
        token: String,
        /// Zero-based index of the value being read.
        index: usize,
    },
    /// The node text ran out before every value was read.
    TooFewValues {
        /// Node name.
        node: String,
        /// Values required.
        expected: usize,
        /// Values found.
        found: usize,
    },
    /// Text remained after every value was read.
    TrailingContent {
        /// Node name.
        node: String,
        /// The start of the leftover text.
        context: String,
    },
    /// A destination or source buffer has the wrong size.
    SizeMismatch {
        /// Node name.
        node: String,
        /// Bytes required.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// A binary data file has the wrong length.
    FileSize {
        /// Resolved file path.
        path: PathBuf,
        /// Bytes required.
        expected: u64,
        /// Bytes on disk.
        actual: u64,
    },
    /// Real/imaginary split does not match the node's complexity or layout.
    ComplexMismatch {
        /// Node name.
        node: String,
        /// What went wrong.
        detail: &'static str,
    },
    /// The node is not of the composite kind an operation needs.
    NotComposite {
        /// Node name.
        node: String,
        /// `"struct"`, `"cell"` or `"string"`.
        expected: &'static str,
    },
    /// A struct has no field of this name.
    NoSuchField {
        /// Node name.
        node: String,
        /// Field name.
        field: String,
    },
    /// A struct already has a field of this name.
    DuplicateField {
        /// Node name.
        node: String,
        /// Field name.
        field: String,
    },
    /// Fields can only be added to a scalar struct.
    NotScalarStruct {
        /// Node name.
        node: String,
    },
    /// A struct or cell index is past the end.
    IndexOutOfRange {
        /// Node name.
        node: String,
        /// Requested index.
        index: usize,
        /// Number of entries.
        len: usize,
    },
    /// Precision outside `0..=31`.
    BadPrecision {
        /// The value given.
        value: u32,
    },
    /// The node's element kind differs from the requested Rust type.
    TypeMismatch {
        /// Node name.
        node: String,
        /// Kind requested.
        expected: ElementKind,
        /// Kind stored.
        found: Option<ElementKind>,
    },
}

impl DataMlError {
    pub(crate) fn structure(node: &str, source: StructureError) -> Self {
        Self::Structure {
            node: node.to_string(),
            source,
        }
    }

    pub(crate) fn io_at(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }
}

impl fmt::Display for DataMlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path: Some(p), source } => {
                write!(f, "I/O error on \"{}\": {source}", p.display())
            }
            Self::Io { path: None, source } => write!(f, "I/O error: {source}"),
            Self::Structure { node, source } => write!(f, "{source} (in node \"{node}\")"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::BadClass { node, class } => {
                write!(f, "unrecognised class \"{class}\" (in node \"{node}\")")
            }
            Self::BadStorage { node, value } => {
                write!(f, "unrecognised storage \"{value}\" (in node \"{node}\")")
            }
            Self::CannotFill { node } => {
                write!(f, "cannot fill from node with this format (in node \"{node}\")")
            }
            Self::MalformedToken { node, token, index } => write!(
                f,
                "malformed number \"{token}\" at element {index} (in node \"{node}\")"
            ),
            Self::TooFewValues {
                node,
                expected,
                found,
            } => write!(
                f,
                "too few values ({found} instead of {expected}) (in node \"{node}\")"
            ),
            Self::TrailingContent { node, context } => write!(
                f,
                "unexpected trailing content \"{context}\" (in node \"{node}\")"
            ),
            Self::SizeMismatch {
                node,
                expected,
                actual,
            } => write!(
                f,
                "buffer size mismatch ({actual} bytes instead of {expected}) (in node \"{node}\")"
            ),
            Self::FileSize {
                path,
                expected,
                actual,
            } => write!(
                f,
                "binary file \"{}\" is the wrong size ({actual} bytes instead of {expected})",
                path.display()
            ),
            Self::ComplexMismatch { node, detail } => write!(f, "{detail} (in node \"{node}\")"),
            Self::NotComposite { node, expected } => {
                write!(f, "node \"{node}\" is not a {expected}")
            }
            Self::NoSuchField { node, field } => {
                write!(f, "field \"{field}\" not found (in node \"{node}\")")
            }
            Self::DuplicateField { node, field } => {
                write!(f, "field \"{field}\" already exists (in node \"{node}\")")
            }
            Self::NotScalarStruct { node } => write!(
                f,
                "can only add fields to a scalar struct (in node \"{node}\")"
            ),
            Self::IndexOutOfRange { node, index, len } => write!(
                f,
                "index {index} out of range for {len} entries (in node \"{node}\")"
            ),
            Self::BadPrecision { value } => {
                write!(f, "precision {value} out of range (0 to 31, or not set)")
            }
            Self::TypeMismatch {
                node,
                expected,
                found,
            } => match found {
                Some(k) => write!(
                    f,
                    "expected data to be of type {expected}, found {k} (in node \"{node}\")"
                ),
                None => write!(
                    f,
                    "expected data to be of type {expected} (in node \"{node}\")"
                ),
            },
        }
    }
}

impl std::error::Error for DataMlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Structure { source, .. } => Some(source),
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DataMlError {
    fn from(source: io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl From<ValidationError> for DataMlError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
