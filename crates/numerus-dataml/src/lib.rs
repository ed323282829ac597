//! DataML codec for Numerus data objects.
//!
//! DataML is the XML dialect in which component state and logged output
//! are stored. This crate works on an in-memory element tree
//! ([`DataMlNode`]) and converts between nodes and typed byte buffers.
//!
//! # Node attributes
//!
//! - `c`: class code, one letter per element kind with an optional `x`
//!   (complex adjacent) or `y` (complex interleaved) suffix. Absent on
//!   string nodes.
//! - `b`: dimensions, space separated. Absent means a scalar.
//! - `s`: storage modifier. `b` means the text names a binary file.
//! - `a`: struct field names, each followed by `;`.
//!
//! # Numeric text
//!
//! Values are whitespace separated. Floats are written `%g` style with
//! full (lossless) precision unless a [`Precision`] is given; `Inf`,
//! `-Inf` and `NaN` are written literally. Complex adjacent data lists
//! every real value and then every imaginary value.
//!
//! # Binary files
//!
//! Large logs are spilled to a file of native-endian elements. For each
//! step of the last dimension the file holds the real chunk and then,
//! for complex adjacent data, the imaginary chunk.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod class;
pub mod codec;
pub mod composite;
pub mod context;
pub mod error;
pub mod format;
pub mod info;
pub mod node;
pub mod scan;
pub mod typed;

pub use class::{class_code, parse_class};
pub use codec::{chunk_bytes, get_raw, set_binary_file, set_raw, validate, write_binary};
pub use composite::{
    add_field, become_cell, become_struct, cell, cell_mut, field, field_mut, field_names,
    get_string, has_field, set_string,
};
pub use context::{CodecContext, Precision, FULL_PRECISION, MAX_PRECISION, PRECISION_NOT_SET};
pub use error::DataMlError;
pub use format::{format_float, format_int, normalize_legacy_specials};
pub use info::{NodeInfo, Storage};
pub use node::DataMlNode;
pub use typed::{get_array, get_complex_array, get_scalar, set_array, set_complex_array};
