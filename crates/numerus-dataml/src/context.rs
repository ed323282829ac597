//! Codec configuration: output precision and the supplementary file path.

use std::path::{Path, PathBuf};

use crate::error::DataMlError;

/// Host encoding of "precision not set".
pub const PRECISION_NOT_SET: u32 = 0x4000_0000;

/// Largest accepted number of significant digits.
pub const MAX_PRECISION: u8 = 31;

/// Digits used for floats when no precision is set.
pub const FULL_PRECISION: u8 = 20;

/// Number of significant digits written for numeric text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    /// Lossless output: floats at [`FULL_PRECISION`] digits, integers exact.
    #[default]
    NotSet,
    /// Explicit digit count, `0..=31`.
    Digits(u8),
}

impl Precision {
    /// Explicit precision. Fails outside `0..=31`.
    pub fn digits(p: u32) -> Result<Self, DataMlError> {
        if p > MAX_PRECISION as u32 {
            return Err(DataMlError::BadPrecision { value: p });
        }
        Ok(Self::Digits(p as u8))
    }

    /// Decode the host's integer encoding.
    pub fn from_host(p: u32) -> Result<Self, DataMlError> {
        if p == PRECISION_NOT_SET {
            Ok(Self::NotSet)
        } else {
            Self::digits(p)
        }
    }

    /// Encode for the host.
    pub fn to_host(self) -> u32 {
        match self {
            Self::NotSet => PRECISION_NOT_SET,
            Self::Digits(p) => p as u32,
        }
    }

    /// The explicit digit count, if any.
    pub fn significant_digits(self) -> Option<u8> {
        match self {
            Self::NotSet => None,
            Self::Digits(p) => Some(p),
        }
    }
}

/// Settings passed to every decode that may touch the file system.
///
/// Replaces process-wide state: the host builds one per document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecContext {
    /// Directory against which relative binary file names resolve.
    pub supplementary_path: Option<PathBuf>,
    /// Precision for encodes driven by this context.
    pub precision: Precision,
}

impl CodecContext {
    /// A context with no supplementary path and precision not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the supplementary file path.
    pub fn with_supplementary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.supplementary_path = Some(path.into());
        self
    }

    /// Set the output precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Resolve a file name from a node against the supplementary path.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let p = Path::new(name);
        match &self.supplementary_path {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// The name to store in a node for `path`: relative to the
    /// supplementary path when it lies beneath it.
    pub fn relativize(&self, path: &Path) -> String {
        let rel = self
            .supplementary_path
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        rel.to_string_lossy().into_owned()
    }
}
