//! Structure read from a node's attributes.

use numerus_core::{Complexity, ElementKind, Shape, StructureError, TypeTag};

use crate::class::parse_class;
use crate::error::DataMlError;
use crate::node::DataMlNode;

/// Where a node keeps its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    /// Whitespace-separated numbers in the node text.
    Text,
    /// Plain character data in the node text (no `c` attribute).
    String,
    /// The node text names a binary file (`s="b"`).
    BinaryFile,
}

/// Tag, shape and storage mode of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    /// Element kind and complexity, plus layout for complex data.
    pub tag: TypeTag,
    /// Dimensions. A node with no `b` attribute is a scalar.
    pub shape: Shape,
    /// Storage mode.
    pub storage: Storage,
}

impl NodeInfo {
    /// Read the `c`, `b` and `s` attributes of `node`.
    ///
    /// A node with no `c` holds a string of UTF-16 code units, shaped by
    /// `b` if present and read as a `1 × n` array otherwise.
    pub fn from_node(node: &DataMlNode) -> Result<Self, DataMlError> {
        let Some(class) = node.attribute("c") else {
            let shape = match dims(node)? {
                Some(shape) => shape,
                None => Shape::from([1, node.text().encode_utf16().count() as u64]),
            };
            return Ok(Self {
                tag: TypeTag::real(ElementKind::Char16),
                shape,
                storage: Storage::String,
            });
        };
        let tag = parse_class(class).ok_or_else(|| DataMlError::BadClass {
            node: node.name().to_string(),
            class: class.to_string(),
        })?;
        let shape = dims(node)?.unwrap_or_else(Shape::scalar);
        let storage = match node.attribute("s") {
            None => Storage::Text,
            Some("b") => Storage::BinaryFile,
            Some(other) => {
                return Err(DataMlError::BadStorage {
                    node: node.name().to_string(),
                    value: other.to_string(),
                })
            }
        };
        Ok(Self {
            tag,
            shape,
            storage,
        })
    }

    /// Element kind (always set by [`from_node`](Self::from_node)).
    pub fn element(&self) -> ElementKind {
        self.tag.element.unwrap_or(ElementKind::Float64)
    }

    /// `true` if the node holds complex data.
    pub fn is_complex(&self) -> bool {
        self.tag.complexity == Some(Complexity::Complex)
    }

    /// `true` for struct and cell nodes.
    pub fn is_composite(&self) -> bool {
        matches!(self.element(), ElementKind::Struct | ElementKind::Cell)
    }

    /// Number of real elements.
    pub fn elements_real(&self) -> Result<usize, StructureError> {
        numerus_core::element_count_real(&self.shape)
    }
}

/// The `b` attribute, if present.
fn dims(node: &DataMlNode) -> Result<Option<Shape>, DataMlError> {
    node.attribute("b")
        .map(|b| {
            Shape::parse_space(&b.replace(',', " "))
                .map_err(|e| DataMlError::structure(node.name(), e))
        })
        .transpose()
}
