//! Array shapes and shape patterns.
//!
//! [`Shape`] is the concrete extent list of a live array. [`ShapeSpec`]
//! is a pattern over shapes used by validation, where each dimension can
//! be exact, non-zero or unconstrained, and a trailing ellipsis admits
//! extra dimensions.

use std::fmt;

use smallvec::SmallVec;

use crate::error::StructureError;

/// Ordered list of dimension extents, first index varying fastest.
///
/// An empty shape marks a placeholder that was never initialised and
/// holds zero elements. A scalar is `[1]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape(SmallVec<[u64; 4]>);

impl Shape {
    /// Build a shape from a slice of extents.
    pub fn new(dims: &[u64]) -> Self {
        Self(SmallVec::from_slice(dims))
    }

    /// The empty (placeholder) shape.
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    /// The scalar shape `[1]`.
    pub fn scalar() -> Self {
        Self::new(&[1])
    }

    /// Extents as a slice.
    pub fn dims(&self) -> &[u64] {
        &self.0
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// `true` for the placeholder shape.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a dimension.
    pub fn push(&mut self, extent: u64) {
        self.0.push(extent);
    }

    /// Last extent, if any.
    pub fn last(&self) -> Option<u64> {
        self.0.last().copied()
    }

    /// Product of extents; 0 for the empty shape.
    ///
    /// Returns [`StructureError::Overflow`] if the product does not fit
    /// in `u64`.
    pub fn element_count_real(&self) -> Result<u64, StructureError> {
        if self.0.is_empty() {
            return Ok(0);
        }
        self.0.iter().try_fold(1u64, |acc, &d| {
            acc.checked_mul(d).ok_or(StructureError::Overflow)
        })
    }

    /// Product of all extents but the last (1 for rank 0 or 1).
    pub fn leading_count(&self) -> Result<u64, StructureError> {
        let n = self.0.len().saturating_sub(1);
        self.0[..n].iter().try_fold(1u64, |acc, &d| {
            acc.checked_mul(d).ok_or(StructureError::Overflow)
        })
    }

    /// Render as a comma-separated list (`2,3`).
    pub fn comma_string(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        parts.join(",")
    }

    /// Parse a whitespace-separated extent list (DataML `b` attribute).
    pub fn parse_space(text: &str) -> Result<Self, StructureError> {
        text.split_ascii_whitespace()
            .map(|t| parse_extent(t, text))
            .collect::<Result<SmallVec<_>, _>>()
            .map(Self)
    }

    /// Parse a comma-separated extent list (`2,3`).
    ///
    /// Blank entries are rejected. An all-blank input yields the empty
    /// shape.
    pub fn parse_comma(text: &str) -> Result<Self, StructureError> {
        if text.trim().is_empty() {
            return Ok(Self::empty());
        }
        text.split(',')
            .map(|t| parse_extent(t.trim(), text))
            .collect::<Result<SmallVec<_>, _>>()
            .map(Self)
    }
}

fn parse_extent(token: &str, whole: &str) -> Result<u64, StructureError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StructureError::BadDims {
            text: whole.to_string(),
        });
    }
    token.parse().map_err(|_| StructureError::BadDims {
        text: whole.to_string(),
    })
}

impl From<&[u64]> for Shape {
    fn from(dims: &[u64]) -> Self {
        Self::new(dims)
    }
}

impl<const N: usize> From<[u64; N]> for Shape {
    fn from(dims: [u64; N]) -> Self {
        Self::new(&dims)
    }
}

impl fmt::Display for Shape {
    /// Space-separated, as carried by the DataML `b` attribute.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

// ── Shape patterns ──────────────────────────────────────────────

/// Host sentinel for "any extent".
pub const DIM_ANY: i64 = -1;
/// Host sentinel for "any non-zero extent".
pub const DIM_NONZERO: i64 = -2;
/// Host sentinel for "further dimensions unconstrained" (last entry only).
pub const DIM_ELLIPSIS: i64 = -3;

/// Constraint on one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DimSpec {
    /// Must equal this extent.
    Exact(u64),
    /// Must be greater than zero.
    NonZero,
    /// Unconstrained.
    Any,
}

impl DimSpec {
    /// Whether `extent` satisfies this constraint.
    pub fn accepts(self, extent: u64) -> bool {
        match self {
            Self::Exact(n) => n == extent,
            Self::NonZero => extent > 0,
            Self::Any => true,
        }
    }

    /// Whether an absent actual dimension (implicitly 1) is acceptable.
    pub fn accepts_padding(self) -> bool {
        self.accepts(1)
    }
}

/// A pattern over shapes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShapeSpec {
    /// Per-dimension constraints, leading dimensions first.
    pub dims: SmallVec<[DimSpec; 4]>,
    /// When set, actual shapes may carry further trailing dimensions.
    pub ellipsis: bool,
}

impl ShapeSpec {
    /// An exact pattern matching only `shape` (plus trailing 1s).
    pub fn exact(shape: &Shape) -> Self {
        Self {
            dims: shape.dims().iter().map(|&d| DimSpec::Exact(d)).collect(),
            ellipsis: false,
        }
    }

    /// Build from constraint list and ellipsis flag.
    pub fn new(dims: &[DimSpec], ellipsis: bool) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
            ellipsis,
        }
    }

    /// Decode the host's signed sentinel list.
    ///
    /// [`DIM_ELLIPSIS`] is only valid as the last entry.
    pub fn from_raw(raw: &[i64]) -> Result<Self, StructureError> {
        let mut spec = Self::default();
        for (i, &v) in raw.iter().enumerate() {
            match v {
                DIM_ANY => spec.dims.push(DimSpec::Any),
                DIM_NONZERO => spec.dims.push(DimSpec::NonZero),
                DIM_ELLIPSIS if i + 1 == raw.len() => spec.ellipsis = true,
                n if n >= 0 => spec.dims.push(DimSpec::Exact(n as u64)),
                _ => return Err(StructureError::BadDimSentinel { value: v }),
            }
        }
        Ok(spec)
    }
}
