//! Data objects for Numerus components.
//!
//! Two classes are provided. [`NumericData`] holds an n-dimensional
//! numeric array of any supported element kind, real or complex, and
//! serves its content in either complex layout through a per-object
//! [`ConversionCache`]. [`SpikesData`] holds the indices of the elements
//! of a source that fired on the current tick.
//!
//! Both sit behind a host-reserved header in a single [`BufferStore`],
//! so the transport block is one contiguous slice. Both implement
//! [`DataObject`], the operations a host drives without knowing the
//! class, and both can log their content per tick into a DataML node.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod convert;
pub mod error;
pub mod generic;
pub mod log;
pub mod numeric;
pub mod spikes;
pub mod traits;

pub use buffer::BufferStore;
pub use config::{BufferingPolicy, LogConfig, LogTerm};
pub use convert::ConversionCache;
pub use error::DataError;
pub use log::NumericLog;
pub use numeric::{ContentView, ContentViewMut, NumericData, NUMERIC_CLASS, STATE_NODE};
pub use spikes::{SpikesData, SPIKES_CLASS};
pub use traits::{DataObject, StateSet};
