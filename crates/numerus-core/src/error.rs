//! Error types shared by every Numerus crate.
//!
//! Organised by concern: structure (tags, shapes, sizes), content
//! (buffer reads and writes) and validation (pattern mismatches reported
//! against a named port or node).

use std::error::Error;
use std::fmt;

use crate::type_tag::ElementKind;

/// Errors describing an unusable type tag or shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// The tag does not name an element kind.
    ElementUnspecified,
    /// The element kind has no fixed width (struct or cell).
    UnsupportedElement {
        /// The offending kind.
        kind: ElementKind,
    },
    /// The kind is not one of the numeric array kinds.
    InvalidElement {
        /// The offending kind, if one was given.
        kind: Option<ElementKind>,
    },
    /// Complexity was left unspecified where a buffer must be sized.
    ComplexityUnspecified,
    /// Row-major order was requested.
    RowMajor,
    /// A structure was given zero dimensions.
    ZeroRank,
    /// A host bitfield carried bits that do not decode.
    UnrecognisedBits {
        /// The raw bitfield.
        bits: u32,
    },
    /// A dimension list could not be parsed.
    BadDims {
        /// The text that failed.
        text: String,
    },
    /// A raw dimension sentinel was not recognised.
    BadDimSentinel {
        /// The offending value.
        value: i64,
    },
    /// A size computation overflowed.
    Overflow,
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementUnspecified => write!(f, "element type not specified"),
            Self::UnsupportedElement { kind } => {
                write!(f, "element type {kind} has no fixed width")
            }
            Self::InvalidElement { kind: Some(kind) } => {
                write!(f, "invalid element type for a numeric array ({kind})")
            }
            Self::InvalidElement { kind: None } => {
                write!(f, "invalid element type for a numeric array (unspecified)")
            }
            Self::ComplexityUnspecified => write!(f, "must specify complexity"),
            Self::RowMajor => write!(f, "row-major ordering not currently supported"),
            Self::ZeroRank => write!(f, "number of dimensions of array cannot be zero"),
            Self::UnrecognisedBits { bits } => {
                write!(f, "unrecognised type bits 0x{bits:08X}")
            }
            Self::BadDims { text } => write!(f, "malformed dimensions \"{text}\""),
            Self::BadDimSentinel { value } => {
                write!(f, "unrecognised dimension value {value}")
            }
            Self::Overflow => write!(f, "array size overflows addressable memory"),
        }
    }
}

impl Error for StructureError {}

/// Errors from reading or writing array content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentError {
    /// Supplied bytes do not match the expected count.
    ByteCountMismatch {
        /// Bytes the structure requires.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// Transport stream length differs from the buffer size.
    StreamLength {
        /// Bytes the structure requires.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// Real data is required but none was supplied.
    MissingReal,
    /// Imaginary data was supplied for a real object.
    ImagOnRealObject,
    /// Split real/imaginary data was supplied for interleaved storage.
    SplitInterleaved,
    /// A write was requested in a layout other than the stored one.
    ConvertedWrite,
    /// Content exceeds the capacity fixed by the structure.
    CapacityExceeded {
        /// Items supplied.
        count: usize,
        /// Items the structure allows.
        capacity: usize,
    },
    /// An item addresses an element outside the capacity.
    ItemOutOfRange {
        /// The offending item.
        index: i64,
        /// Items the structure allows.
        capacity: usize,
    },
    /// A read or write requested row-major order.
    RowMajorRequest,
    /// Content was requested before the log recorded anything.
    NotLogging,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteCountMismatch { expected, actual } => write!(
                f,
                "wrong number of bytes supplied ({actual} instead of {expected})"
            ),
            Self::StreamLength { expected, actual } => write!(
                f,
                "stream length incorrect in content set ({actual} instead of {expected})"
            ),
            Self::MissingReal => write!(f, "no real data supplied"),
            Self::ImagOnRealObject => {
                write!(f, "imaginary data supplied but object is not complex")
            }
            Self::SplitInterleaved => write!(
                f,
                "complex (interleaved) data should be supplied in a single block"
            ),
            Self::ConvertedWrite => {
                write!(f, "cannot write through a converted complex layout")
            }
            Self::CapacityExceeded { count, capacity } => write!(
                f,
                "too many items supplied ({count} is more than previously set capacity of {capacity})"
            ),
            Self::ItemOutOfRange { index, capacity } => write!(
                f,
                "item {index} is outside the capacity of {capacity}"
            ),
            Self::RowMajorRequest => write!(f, "row-major ordering not currently supported"),
            Self::NotLogging => write!(f, "log has not been initialised"),
        }
    }
}

impl Error for ContentError {}

/// A structure failed validation against a requested pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// The port or node that was validated.
    pub subject: String,
    /// What was expected, e.g. "expected data to be real".
    pub detail: String,
}

impl ValidationError {
    /// Build from subject and detail.
    pub fn new(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (on \"{}\")", self.detail, self.subject)
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_values() {
        let e = ContentError::StreamLength {
            expected: 48,
            actual: 40,
        };
        assert_eq!(
            e.to_string(),
            "stream length incorrect in content set (40 instead of 48)"
        );
        let v = ValidationError::new("in", "expected data to be real");
        assert_eq!(v.to_string(), "expected data to be real (on \"in\")");
        assert_eq!(
            StructureError::RowMajor.to_string(),
            "row-major ordering not currently supported"
        );
    }
}
