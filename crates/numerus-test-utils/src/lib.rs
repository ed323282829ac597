//! Test fixtures and byte helpers for Numerus development.
//!
//! Provides deterministic sample content for every element kind
//! ([`ramp_bytes`]), typed/byte conversion shorthands and the standard
//! complex example used across the workspace ([`ComplexExample`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{ComplexExample, SAMPLE_SHAPES};

use numerus_core::{decode_slice, encode_slice, Element, ElementKind, ElementVisitor};

/// Native-endian bytes of `values`.
pub fn bytes_of<T: Element>(values: &[T]) -> Vec<u8> {
    encode_slice(values)
}

/// Values decoded from native-endian `bytes`.
pub fn values_of<T: Element>(bytes: &[u8]) -> Vec<T> {
    decode_slice(bytes)
}

struct Ramp {
    count: usize,
    offset: i128,
    bool_like: bool,
}

impl ElementVisitor for Ramp {
    type Output = Vec<u8>;

    fn visit<T: Element>(self) -> Vec<u8> {
        let values: Vec<T> = (0..self.count as i128)
            .map(|i| {
                if self.bool_like {
                    T::from_i128((i + self.offset) & 1)
                } else {
                    // alternate sign so signed kinds see negatives
                    let v = (i + self.offset) * if i % 2 == 0 { 1 } else { -1 };
                    T::from_i128(v)
                }
            })
            .collect();
        encode_slice(&values)
    }
}

/// `count` deterministic values of `kind` as bytes, starting at
/// `offset`. Bool kinds alternate 0 and 1; unsigned kinds clamp
/// negatives to 0. Struct and cell kinds yield an empty buffer.
pub fn ramp_bytes(kind: ElementKind, count: usize, offset: i128) -> Vec<u8> {
    kind.visit(Ramp {
        count,
        offset,
        bool_like: kind == ElementKind::Bool8,
    })
    .unwrap_or_default()
}

/// `count` float values with fractional parts and a mix of signs and
/// magnitudes, as native-endian `f64` bytes.
pub fn awkward_f64_bytes(count: usize) -> Vec<u8> {
    let values: Vec<f64> = (0..count)
        .map(|i| {
            let x = i as f64 + 1.0;
            match i % 4 {
                0 => x / 3.0,
                1 => -x * 1.0e-7,
                2 => x.sqrt() * 1.0e12,
                _ => std::f64::consts::PI / x,
            }
        })
        .collect();
    encode_slice(&values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_lengths() {
        for kind in ElementKind::ARRAY_KINDS {
            let b = ramp_bytes(kind, 5, 0);
            assert_eq!(b.len(), 5 * kind.width().unwrap());
        }
        assert!(ramp_bytes(ElementKind::Cell, 5, 0).is_empty());
    }

    #[test]
    fn bool_ramp_alternates() {
        assert_eq!(ramp_bytes(ElementKind::Bool8, 4, 0), [0, 1, 0, 1]);
    }
}
