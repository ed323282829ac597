//! Numerus: typed numeric data objects for component simulation hosts.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Numerus sub-crates. For most users, adding `numerus` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use numerus::prelude::*;
//!
//! // A 2×3 complex array stored adjacent: every real value, then every
//! // imaginary value.
//! let mut data = NumericData::with_structure(
//!     TypeTag::complex(ElementKind::Float64).with_layout(ComplexLayout::Adjacent),
//!     Shape::from([2, 3]),
//! )
//! .unwrap();
//! let re: &[f64] = &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
//! let im: &[f64] = &[6.0, 7.0, 8.0, 9.0, 10.0, 11.0];
//! data.set_values(re, Some(im)).unwrap();
//!
//! // A reader that wants interleaved pairs gets a cached conversion.
//! let view = data
//!     .content(&TypeTag::layout_request(ComplexLayout::Interleaved))
//!     .unwrap();
//! assert!(view.converted);
//! assert_eq!(data.conversions(), 1);
//!
//! // State goes out and comes back through DataML.
//! let node = data.state_get(Precision::NotSet).unwrap();
//! let mut copy = NumericData::new();
//! copy.state_set(StateSet::Node(&node), &CodecContext::new()).unwrap();
//! assert_eq!(copy.values::<f64>().unwrap(), data.values::<f64>().unwrap());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `numerus-core` | Type tags, shapes, structures, validation, errors |
//! | [`dataml`] | `numerus-dataml` | DataML nodes and the array codec |
//! | [`data`] | `numerus-data` | Numeric and spike objects, conversion cache, logging |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Type tags, shapes and structure validation (`numerus-core`).
///
/// [`types::TypeTag`] and [`types::Shape`] describe an array;
/// [`types::Structure`] is the resolved pair with its derived sizes.
pub use numerus_core as types;

/// The DataML element tree and array codec (`numerus-dataml`).
///
/// Encode with [`dataml::set_raw`], decode with [`dataml::get_raw`];
/// struct and cell nodes are built with [`dataml::become_struct`] and
/// [`dataml::become_cell`].
pub use numerus_dataml as dataml;

/// Data objects (`numerus-data`).
///
/// [`data::NumericData`] and [`data::SpikesData`], both behind the
/// [`data::DataObject`] trait.
pub use numerus_data as data;

/// Common imports for typical Numerus usage.
///
/// ```rust
/// use numerus::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use numerus_core::{
        ComplexLayout, Complexity, Element, ElementKind, MemoryOrder, Shape, ShapeSpec,
        Structure, TypeTag,
    };

    // Errors
    pub use numerus_core::{ContentError, StructureError, ValidationError};
    pub use numerus_data::DataError;
    pub use numerus_dataml::DataMlError;

    // DataML
    pub use numerus_dataml::{CodecContext, DataMlNode, Precision};

    // Data objects
    pub use numerus_data::{
        BufferingPolicy, DataObject, LogConfig, LogTerm, NumericData, SpikesData, StateSet,
    };
}
