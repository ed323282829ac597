//! The capability set every data class exposes to its host.

use numerus_core::TypeTag;
use numerus_dataml::{CodecContext, DataMlNode, Precision};

use crate::error::DataError;

/// Source of a state assignment.
#[derive(Clone, Copy, Debug)]
pub enum StateSet<'a> {
    /// The class's "undefined" value: NaN for float content, otherwise
    /// whatever the class treats as empty.
    Undefined,
    /// Zero content.
    Zero,
    /// Structure and content read from a DataML node.
    Node(&'a DataMlNode),
}

/// Operations a host drives on any data object, whatever its class.
///
/// Class-specific operations (typed content, logging) are inherent
/// methods on the implementing types.
pub trait DataObject: Send + Sync {
    /// Class name, e.g. `std/2009/data/numeric`.
    fn class_name(&self) -> &'static str;

    /// Reserve `header_bytes` in front of the content for the host's
    /// transport header. Zero leaves the layout as it is.
    fn init_complete(&mut self, header_bytes: usize);

    /// Header and content as one block, for transport.
    fn transport_stream(&self) -> &[u8];

    /// Replace the content from a transport block (header excluded).
    fn set_transport_content(&mut self, stream: &[u8]) -> Result<(), DataError>;

    /// Structure and content as a `<State>` node.
    fn state_get(&self, precision: Precision) -> Result<DataMlNode, DataError>;

    /// Assign state.
    fn state_set(&mut self, state: StateSet<'_>, ctx: &CodecContext) -> Result<(), DataError>;

    /// Structure as a generic structure string.
    fn generic_structure(&self, request: &TypeTag) -> String;

    /// Restructure from a generic structure string and return the
    /// effective type.
    fn set_generic_structure(&mut self, text: &str, base: &TypeTag) -> Result<TypeTag, DataError>;

    /// An independent copy with the same structure and content.
    fn duplicate(&self) -> Box<dyn DataObject>;
}
