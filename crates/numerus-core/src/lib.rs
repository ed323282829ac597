//! Core types for Numerus data objects.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the element and type model ([`TypeTag`], [`ElementKind`]), shapes and
//! shape patterns ([`Shape`], [`ShapeSpec`]), the resolved [`Structure`]
//! with its derived sizes, typed byte access ([`Element`]), structure
//! validation against wildcard patterns and the error types shared by
//! the rest of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod shape;
pub mod structure;
pub mod type_tag;
pub mod validate;

pub use element::{decode_slice, encode_slice, Element, ElementVisitor, Scalar};
pub use error::{ContentError, StructureError, ValidationError};
pub use shape::{DimSpec, Shape, ShapeSpec, DIM_ANY, DIM_ELLIPSIS, DIM_NONZERO};
pub use structure::{bytes_per_element, bytes_total, complex_multiplier, element_count_real, Structure};
pub use type_tag::{ComplexLayout, Complexity, ElementFormat, ElementKind, MemoryOrder, TypeTag};
pub use validate::{validate_shape, validate_structure, validate_type};
