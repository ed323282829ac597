//! Benchmark profiles for the Numerus data objects.
//!
//! - [`complex_profile`]: a square complex `DOUBLE` matrix with a known
//!   ramp in each channel, in either layout
//! - [`spike_profile`]: a spike source with every `stride`-th element
//!   firing

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use numerus_core::{ComplexLayout, ElementKind, Shape, TypeTag};
use numerus_data::{NumericData, SpikesData};

/// Side of the square matrices used by the reference profiles.
pub const REFERENCE_SIDE: u64 = 256;

/// A `side × side` complex `DOUBLE` object stored in `layout`.
///
/// Element `i` holds `i + 0.5` in the real channel and `-(i + 0.5)` in
/// the imaginary channel.
pub fn complex_profile(side: u64, layout: ComplexLayout) -> NumericData {
    let n = (side * side) as usize;
    let re: Vec<f64> = (0..n).map(|i| i as f64 + 0.5).collect();
    let im: Vec<f64> = re.iter().map(|v| -v).collect();
    let shape = Shape::from([side, side]);

    let mut d = NumericData::with_structure(
        TypeTag::complex(ElementKind::Float64).with_layout(ComplexLayout::Adjacent),
        shape.clone(),
    )
    .unwrap();
    d.set_values(&re, Some(&im)).unwrap();
    if layout == ComplexLayout::Adjacent {
        return d;
    }

    let interleaved = d
        .content(&TypeTag::layout_request(ComplexLayout::Interleaved))
        .unwrap()
        .real
        .to_vec();
    let mut out = NumericData::with_structure(
        TypeTag::complex(ElementKind::Float64).with_layout(ComplexLayout::Interleaved),
        shape,
    )
    .unwrap();
    out.set_content(&interleaved, None).unwrap();
    out
}

/// A `side × side` spike source with every `stride`-th element firing.
pub fn spike_profile(side: u64, stride: usize) -> SpikesData {
    let mut s = SpikesData::with_dims(Shape::from([side, side])).unwrap();
    let fired: Vec<i32> = (0..s.capacity())
        .step_by(stride.max(1))
        .map(|i| i as i32)
        .collect();
    s.set_content(&fired).unwrap();
    s
}
