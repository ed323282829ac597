//! Reusable data fixtures.
//!
//! - [`ComplexExample`]: a `2 × 3` complex `DOUBLE` array with known
//!   real and imaginary channels and its interleaved form.
//! - [`SAMPLE_SHAPES`]: shapes covering scalar, vector, matrix, empty
//!   and higher-rank cases.

use numerus_core::{ComplexLayout, ElementKind, MemoryOrder, Shape, TypeTag};

use crate::bytes_of;

/// Shapes exercised by round-trip tests.
pub const SAMPLE_SHAPES: &[&[u64]] = &[&[1], &[5], &[2, 3], &[3, 1], &[0], &[2, 0, 3], &[2, 2, 2]];

/// Complex `DOUBLE` array of shape `[2, 3]`, real `0..6`, imaginary
/// `6..12`.
pub struct ComplexExample {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl ComplexExample {
    pub fn new() -> Self {
        Self {
            real: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            imag: vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0],
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::from([2, 3])
    }

    /// Resolved adjacent tag.
    pub fn adjacent_tag(&self) -> TypeTag {
        TypeTag::complex(ElementKind::Float64)
            .with_layout(ComplexLayout::Adjacent)
            .with_order(MemoryOrder::ColumnMajor)
    }

    /// Resolved interleaved tag.
    pub fn interleaved_tag(&self) -> TypeTag {
        TypeTag::complex(ElementKind::Float64)
            .with_layout(ComplexLayout::Interleaved)
            .with_order(MemoryOrder::ColumnMajor)
    }

    pub fn real_bytes(&self) -> Vec<u8> {
        bytes_of(&self.real)
    }

    pub fn imag_bytes(&self) -> Vec<u8> {
        bytes_of(&self.imag)
    }

    /// Adjacent block: every real value, then every imaginary value.
    pub fn adjacent_bytes(&self) -> Vec<u8> {
        let mut b = self.real_bytes();
        b.extend(self.imag_bytes());
        b
    }

    /// `{0,6,1,7,2,8,3,9,4,10,5,11}`.
    pub fn interleaved(&self) -> Vec<f64> {
        self.real
            .iter()
            .zip(&self.imag)
            .flat_map(|(&r, &i)| [r, i])
            .collect()
    }

    pub fn interleaved_bytes(&self) -> Vec<u8> {
        bytes_of(&self.interleaved())
    }
}

impl Default for ComplexExample {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_order() {
        let ex = ComplexExample::new();
        assert_eq!(
            ex.interleaved(),
            [0.0, 6.0, 1.0, 7.0, 2.0, 8.0, 3.0, 9.0, 4.0, 10.0, 5.0, 11.0]
        );
    }
}
