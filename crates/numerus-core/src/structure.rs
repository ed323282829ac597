//! Resolved array structure with derived sizes.

use std::fmt;

use crate::error::StructureError;
use crate::shape::Shape;
use crate::type_tag::{ComplexLayout, Complexity, ElementKind, MemoryOrder, TypeTag};

/// Bytes per element of `tag`.
pub fn bytes_per_element(tag: &TypeTag) -> Result<usize, StructureError> {
    tag.bytes_per_element()
}

/// 2 if `tag` is complex, 1 if real. Unspecified complexity fails.
pub fn complex_multiplier(tag: &TypeTag) -> Result<usize, StructureError> {
    tag.complex_multiplier()
}

/// Product of extents (0 for the empty shape).
pub fn element_count_real(shape: &Shape) -> Result<usize, StructureError> {
    let n = shape.element_count_real()?;
    usize::try_from(n).map_err(|_| StructureError::Overflow)
}

/// `element_count_real × complex_multiplier × bytes_per_element`.
pub fn bytes_total(tag: &TypeTag, shape: &Shape) -> Result<usize, StructureError> {
    let bpe = bytes_per_element(tag)?;
    let mult = complex_multiplier(tag)?;
    element_count_real(shape)?
        .checked_mul(mult)
        .and_then(|n| n.checked_mul(bpe))
        .ok_or(StructureError::Overflow)
}

/// A fully specified type tag and shape with their derived sizes.
///
/// Only [`Structure::resolve`] constructs one, so every instance names
/// an array kind, an explicit complexity, a concrete layout and
/// column-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    tag: TypeTag,
    shape: Shape,
    bytes_per_element: usize,
    elements_real: usize,
    bytes_real: usize,
}

impl Structure {
    /// Check `tag` and `shape` as a numeric array structure and apply
    /// defaults (adjacent layout, column-major order).
    pub fn resolve(tag: TypeTag, shape: Shape) -> Result<Self, StructureError> {
        let element = match tag.element {
            Some(kind) if kind.is_array_kind() => kind,
            other => return Err(StructureError::InvalidElement { kind: other }),
        };
        if shape.is_empty() {
            return Err(StructureError::ZeroRank);
        }
        let complexity = tag
            .complexity
            .ok_or(StructureError::ComplexityUnspecified)?;
        if tag.order == Some(MemoryOrder::RowMajor) {
            return Err(StructureError::RowMajor);
        }
        let tag = TypeTag {
            element: Some(element),
            complexity: Some(complexity),
            layout: Some(tag.layout.unwrap_or(ComplexLayout::Adjacent)),
            order: Some(MemoryOrder::ColumnMajor),
        };
        Self::with_resolved_tag(tag, shape)
    }

    /// The structure of a freshly constructed numeric object:
    /// real `DOUBLE` of shape `[0]`.
    pub fn placeholder() -> Self {
        Self {
            tag: TypeTag::real(ElementKind::Float64)
                .with_layout(ComplexLayout::Adjacent)
                .with_order(MemoryOrder::ColumnMajor),
            shape: Shape::from([0]),
            bytes_per_element: 8,
            elements_real: 0,
            bytes_real: 0,
        }
    }

    fn with_resolved_tag(tag: TypeTag, shape: Shape) -> Result<Self, StructureError> {
        let bytes_per_element = tag.bytes_per_element()?;
        let elements_real = element_count_real(&shape)?;
        let bytes_real = elements_real
            .checked_mul(bytes_per_element)
            .ok_or(StructureError::Overflow)?;
        // total must also fit
        bytes_real.checked_mul(2).ok_or(StructureError::Overflow)?;
        Ok(Self {
            tag,
            shape,
            bytes_per_element,
            elements_real,
            bytes_real,
        })
    }

    /// The resolved tag. All four fields are `Some`.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// The shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Element kind.
    pub fn element(&self) -> ElementKind {
        self.tag.element.unwrap_or(ElementKind::Float64)
    }

    /// Physical complex layout.
    pub fn layout(&self) -> ComplexLayout {
        self.tag.layout.unwrap_or(ComplexLayout::Adjacent)
    }

    /// `true` if complex.
    pub fn is_complex(&self) -> bool {
        self.tag.complexity == Some(Complexity::Complex)
    }

    /// `true` if complex and interleaved.
    pub fn is_interleaved(&self) -> bool {
        self.is_complex() && self.layout() == ComplexLayout::Interleaved
    }

    /// `true` when exactly one real element is held.
    pub fn is_scalar(&self) -> bool {
        self.elements_real == 1
    }

    /// Width of one element.
    pub fn bytes_per_element(&self) -> usize {
        self.bytes_per_element
    }

    /// Element count of one channel.
    pub fn elements_real(&self) -> usize {
        self.elements_real
    }

    /// Element count including the imaginary channel.
    pub fn elements_total(&self) -> usize {
        self.elements_real * self.multiplier()
    }

    /// Byte count of one channel.
    pub fn bytes_real(&self) -> usize {
        self.bytes_real
    }

    /// Byte count including the imaginary channel.
    pub fn bytes_total(&self) -> usize {
        self.bytes_real * self.multiplier()
    }

    fn multiplier(&self) -> usize {
        if self.is_complex() {
            2
        } else {
            1
        }
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.tag, self.shape.comma_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_derived() {
        let s = Structure::resolve(TypeTag::complex(ElementKind::Int16), Shape::from([2, 3])).unwrap();
        assert_eq!(s.bytes_per_element(), 2);
        assert_eq!(s.elements_real(), 6);
        assert_eq!(s.elements_total(), 12);
        assert_eq!(s.bytes_real(), 12);
        assert_eq!(s.bytes_total(), 24);
        assert_eq!(s.layout(), ComplexLayout::Adjacent);
        assert_eq!(s.tag().order, Some(MemoryOrder::ColumnMajor));
    }

    #[test]
    fn free_functions() {
        let tag = TypeTag::complex(ElementKind::Float32);
        assert_eq!(bytes_per_element(&tag), Ok(4));
        assert_eq!(complex_multiplier(&tag), Ok(2));
        assert_eq!(element_count_real(&Shape::from([4, 5])), Ok(20));
        assert_eq!(bytes_total(&tag, &Shape::from([4, 5])), Ok(160));
        assert_eq!(
            bytes_total(&TypeTag::unspecified(), &Shape::scalar()),
            Err(StructureError::ElementUnspecified)
        );
    }

    #[test]
    fn resolve_rejections() {
        let shape = Shape::scalar();
        assert_eq!(
            Structure::resolve(TypeTag::real(ElementKind::Char16), shape.clone()),
            Err(StructureError::InvalidElement {
                kind: Some(ElementKind::Char16)
            })
        );
        assert_eq!(
            Structure::resolve(TypeTag::real(ElementKind::Float64), Shape::empty()),
            Err(StructureError::ZeroRank)
        );
        let no_cpx = TypeTag {
            element: Some(ElementKind::Float64),
            ..TypeTag::unspecified()
        };
        assert_eq!(
            Structure::resolve(no_cpx, shape.clone()),
            Err(StructureError::ComplexityUnspecified)
        );
        assert_eq!(
            Structure::resolve(
                TypeTag::real(ElementKind::Float64).with_order(MemoryOrder::RowMajor),
                shape
            ),
            Err(StructureError::RowMajor)
        );
    }

    #[test]
    fn placeholder_is_empty_double() {
        let s = Structure::placeholder();
        assert_eq!(s.element(), ElementKind::Float64);
        assert_eq!(s.bytes_total(), 0);
        assert!(!s.is_scalar());
    }
}
