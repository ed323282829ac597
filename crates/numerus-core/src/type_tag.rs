//! Element kinds and the [`TypeTag`] describing an array's storage.
//!
//! A `TypeTag` has four independent fields, each of which may be left
//! unspecified (`None`). Unspecified fields act as wildcards when a tag is
//! used as a request or a validation pattern; a live array always carries
//! a fully specified tag.

use std::fmt;

use crate::error::StructureError;

/// The element type of an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// IEEE-754 single precision.
    Float32,
    /// IEEE-754 double precision.
    Float64,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Boolean stored in one byte.
    Bool8,
    /// UTF-16 code unit.
    Char16,
    /// Struct array (DataML composite).
    Struct,
    /// Cell array (DataML composite).
    Cell,
}

/// Numeric format family of an [`ElementKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementFormat {
    /// Floating point.
    Float,
    /// Signed integer.
    Int,
    /// Unsigned integer.
    UInt,
    /// Boolean.
    Bool,
    /// Character.
    Char,
    /// Struct composite.
    Struct,
    /// Cell composite.
    Cell,
}

impl ElementKind {
    /// The eleven kinds a numeric array can hold.
    pub const ARRAY_KINDS: [ElementKind; 11] = [
        Self::Float32,
        Self::Float64,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Bool8,
    ];

    /// Width of one element in bytes, or `None` for composite kinds.
    pub fn width(self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool8 => Some(1),
            Self::Int16 | Self::UInt16 | Self::Char16 => Some(2),
            Self::Float32 | Self::Int32 | Self::UInt32 => Some(4),
            Self::Float64 | Self::Int64 | Self::UInt64 => Some(8),
            Self::Struct | Self::Cell => None,
        }
    }

    /// Format family of this kind.
    pub fn format(self) -> ElementFormat {
        match self {
            Self::Float32 | Self::Float64 => ElementFormat::Float,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => ElementFormat::Int,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => ElementFormat::UInt,
            Self::Bool8 => ElementFormat::Bool,
            Self::Char16 => ElementFormat::Char,
            Self::Struct => ElementFormat::Struct,
            Self::Cell => ElementFormat::Cell,
        }
    }

    /// Whether a numeric array object may be constructed with this kind.
    pub fn is_array_kind(self) -> bool {
        Self::ARRAY_KINDS.contains(&self)
    }

    /// Whether this kind carries IEEE special values (`Inf`, `NaN`).
    pub fn is_float(self) -> bool {
        self.format() == ElementFormat::Float
    }

    /// Upper-case name used in messages and generic structure strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Float32 => "SINGLE",
            Self::Float64 => "DOUBLE",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::UInt8 => "UINT8",
            Self::UInt16 => "UINT16",
            Self::UInt32 => "UINT32",
            Self::UInt64 => "UINT64",
            Self::Bool8 => "BOOL8",
            Self::Char16 => "CHAR16",
            Self::Struct => "STRUCT",
            Self::Cell => "CELL",
        }
    }

    /// Parse a name produced by [`name`](Self::name). Only array kinds are
    /// accepted, matching what generic structure strings may carry.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ARRAY_KINDS.iter().copied().find(|k| k.name() == name)
    }

    fn bits(self) -> u32 {
        match self {
            Self::Float32 => FORMAT_FLOAT | WIDTH_32,
            Self::Float64 => FORMAT_FLOAT | WIDTH_64,
            Self::Int8 => FORMAT_INT | WIDTH_8,
            Self::Int16 => FORMAT_INT | WIDTH_16,
            Self::Int32 => FORMAT_INT | WIDTH_32,
            Self::Int64 => FORMAT_INT | WIDTH_64,
            Self::UInt8 => FORMAT_UINT | WIDTH_8,
            Self::UInt16 => FORMAT_UINT | WIDTH_16,
            Self::UInt32 => FORMAT_UINT | WIDTH_32,
            Self::UInt64 => FORMAT_UINT | WIDTH_64,
            Self::Bool8 => FORMAT_BOOL | WIDTH_8,
            Self::Char16 => FORMAT_CHAR | WIDTH_16,
            Self::Struct => FORMAT_STRUCT,
            Self::Cell => FORMAT_CELL,
        }
    }

    fn from_bits(bits: u32) -> Option<Self> {
        [
            Self::Float32,
            Self::Float64,
            Self::Int8,
            Self::Int16,
            Self::Int32,
            Self::Int64,
            Self::UInt8,
            Self::UInt16,
            Self::UInt32,
            Self::UInt64,
            Self::Bool8,
            Self::Char16,
            Self::Struct,
            Self::Cell,
        ]
        .into_iter()
        .find(|k| k.bits() == bits)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an array has an imaginary part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Complexity {
    /// Real values only.
    Real,
    /// Real and imaginary values.
    Complex,
}

/// Physical grouping of real and imaginary values in complex storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComplexLayout {
    /// All real values, followed by all imaginary values.
    Adjacent,
    /// Real and imaginary values alternate per element.
    Interleaved,
}

/// Memory order of a multi-dimensional array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoryOrder {
    /// First index varies fastest. The only order ever stored.
    ColumnMajor,
    /// Last index varies fastest. Representable, always rejected.
    RowMajor,
}

// Host bitfield constants.
const WIDTH_8: u32 = 0x0000_0001;
const WIDTH_16: u32 = 0x0000_0002;
const WIDTH_32: u32 = 0x0000_0003;
const WIDTH_64: u32 = 0x0000_0004;
const FORMAT_FLOAT: u32 = 0x0000_0010;
const FORMAT_INT: u32 = 0x0000_0030;
const FORMAT_UINT: u32 = 0x0000_0040;
const FORMAT_BOOL: u32 = 0x0000_0050;
const FORMAT_CHAR: u32 = 0x0000_0060;
const FORMAT_STRUCT: u32 = 0x0000_00A0;
const FORMAT_CELL: u32 = 0x0000_00B0;
const ELEMENT_MASK: u32 = 0x0000_00FF;
const REAL: u32 = 0x0000_0100;
const COMPLEX: u32 = 0x0000_0200;
const COMPLEX_MASK: u32 = 0x0000_0300;
const ADJACENT: u32 = 0x0000_0400;
const INTERLEAVED: u32 = 0x0000_0800;
const LAYOUT_MASK: u32 = 0x0000_0C00;
const COLUMN_MAJOR: u32 = 0x0000_1000;
const ROW_MAJOR: u32 = 0x0000_2000;
const ORDER_MASK: u32 = 0x0000_3000;
const ARRAY_MASK: u32 = ELEMENT_MASK | COMPLEX_MASK | LAYOUT_MASK | ORDER_MASK;

/// Element kind, complexity, complex layout and memory order of an array.
///
/// Any field may be `None` ("unspecified"). See the module docs for how
/// unspecified fields are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Element kind.
    pub element: Option<ElementKind>,
    /// Real or complex.
    pub complexity: Option<Complexity>,
    /// Physical complex layout.
    pub layout: Option<ComplexLayout>,
    /// Memory order.
    pub order: Option<MemoryOrder>,
}

impl TypeTag {
    /// A tag with every field unspecified.
    pub const fn unspecified() -> Self {
        Self {
            element: None,
            complexity: None,
            layout: None,
            order: None,
        }
    }

    /// A tag with element kind and complexity set, layout and order
    /// left unspecified.
    pub const fn new(element: ElementKind, complexity: Complexity) -> Self {
        Self {
            element: Some(element),
            complexity: Some(complexity),
            layout: None,
            order: None,
        }
    }

    /// Shorthand for a real array of `element`.
    pub const fn real(element: ElementKind) -> Self {
        Self::new(element, Complexity::Real)
    }

    /// Shorthand for a complex array of `element`.
    pub const fn complex(element: ElementKind) -> Self {
        Self::new(element, Complexity::Complex)
    }

    /// A request tag that only states a complex layout.
    pub const fn layout_request(layout: ComplexLayout) -> Self {
        Self {
            element: None,
            complexity: None,
            layout: Some(layout),
            order: None,
        }
    }

    /// Return a copy with the complex layout set.
    pub const fn with_layout(mut self, layout: ComplexLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Return a copy with the memory order set.
    pub const fn with_order(mut self, order: MemoryOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// `true` if complexity is explicitly [`Complexity::Complex`].
    pub fn is_complex(&self) -> bool {
        self.complexity == Some(Complexity::Complex)
    }

    /// Bytes per element.
    ///
    /// Fails when the element kind is unspecified or has no width.
    pub fn bytes_per_element(&self) -> Result<usize, StructureError> {
        match self.element {
            None => Err(StructureError::ElementUnspecified),
            Some(kind) => kind
                .width()
                .ok_or(StructureError::UnsupportedElement { kind }),
        }
    }

    /// 2 for complex arrays, 1 for real arrays.
    ///
    /// Fails when complexity is unspecified: it is never inferred.
    pub fn complex_multiplier(&self) -> Result<usize, StructureError> {
        match self.complexity {
            Some(Complexity::Real) => Ok(1),
            Some(Complexity::Complex) => Ok(2),
            None => Err(StructureError::ComplexityUnspecified),
        }
    }

    /// Encode as the host bitfield constant.
    pub fn to_bits(&self) -> u32 {
        let mut bits = self.element.map_or(0, ElementKind::bits);
        bits |= match self.complexity {
            None => 0,
            Some(Complexity::Real) => REAL,
            Some(Complexity::Complex) => COMPLEX,
        };
        bits |= match self.layout {
            None => 0,
            Some(ComplexLayout::Adjacent) => ADJACENT,
            Some(ComplexLayout::Interleaved) => INTERLEAVED,
        };
        bits |= match self.order {
            None => 0,
            Some(MemoryOrder::ColumnMajor) => COLUMN_MAJOR,
            Some(MemoryOrder::RowMajor) => ROW_MAJOR,
        };
        bits
    }

    /// Decode a host bitfield constant.
    pub fn from_bits(bits: u32) -> Result<Self, StructureError> {
        if bits & !ARRAY_MASK != 0 {
            return Err(StructureError::UnrecognisedBits { bits });
        }
        let element = match bits & ELEMENT_MASK {
            0 => None,
            code => Some(
                ElementKind::from_bits(code).ok_or(StructureError::UnrecognisedBits { bits })?,
            ),
        };
        let complexity = match bits & COMPLEX_MASK {
            0 => None,
            REAL => Some(Complexity::Real),
            COMPLEX => Some(Complexity::Complex),
            _ => return Err(StructureError::UnrecognisedBits { bits }),
        };
        let layout = match bits & LAYOUT_MASK {
            0 => None,
            ADJACENT => Some(ComplexLayout::Adjacent),
            INTERLEAVED => Some(ComplexLayout::Interleaved),
            _ => return Err(StructureError::UnrecognisedBits { bits }),
        };
        let order = match bits & ORDER_MASK {
            0 => None,
            COLUMN_MAJOR => Some(MemoryOrder::ColumnMajor),
            ROW_MAJOR => Some(MemoryOrder::RowMajor),
            _ => return Err(StructureError::UnrecognisedBits { bits }),
        };
        Ok(Self {
            element,
            complexity,
            layout,
            order,
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Some(kind) => write!(f, "{kind}")?,
            None => f.write_str("*")?,
        }
        match self.complexity {
            Some(Complexity::Real) => f.write_str("/REAL")?,
            Some(Complexity::Complex) => f.write_str("/COMPLEX")?,
            None => f.write_str("/*")?,
        }
        match self.layout {
            Some(ComplexLayout::Adjacent) => f.write_str("/CPXFMT_ADJACENT")?,
            Some(ComplexLayout::Interleaved) => f.write_str("/CPXFMT_INTERLEAVED")?,
            None => {}
        }
        match self.order {
            Some(MemoryOrder::ColumnMajor) => f.write_str("/COLUMN_MAJOR"),
            Some(MemoryOrder::RowMajor) => f.write_str("/ROW_MAJOR"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_tag() -> impl Strategy<Value = TypeTag> {
        let kinds = prop::sample::select(vec![
            None,
            Some(ElementKind::Float32),
            Some(ElementKind::Float64),
            Some(ElementKind::Int8),
            Some(ElementKind::UInt64),
            Some(ElementKind::Bool8),
            Some(ElementKind::Char16),
            Some(ElementKind::Struct),
            Some(ElementKind::Cell),
        ]);
        let cpx = prop::sample::select(vec![None, Some(Complexity::Real), Some(Complexity::Complex)]);
        let layout = prop::sample::select(vec![
            None,
            Some(ComplexLayout::Adjacent),
            Some(ComplexLayout::Interleaved),
        ]);
        let order = prop::sample::select(vec![
            None,
            Some(MemoryOrder::ColumnMajor),
            Some(MemoryOrder::RowMajor),
        ]);
        (kinds, cpx, layout, order).prop_map(|(element, complexity, layout, order)| TypeTag {
            element,
            complexity,
            layout,
            order,
        })
    }

    proptest! {
        #[test]
        fn bits_roundtrip(tag in arb_tag()) {
            prop_assert_eq!(TypeTag::from_bits(tag.to_bits()).unwrap(), tag);
        }
    }

    #[test]
    fn host_constants_match() {
        assert_eq!(TypeTag::real(ElementKind::Float64).to_bits(), 0x114);
        assert_eq!(
            TypeTag::complex(ElementKind::Int16)
                .with_layout(ComplexLayout::Interleaved)
                .with_order(MemoryOrder::ColumnMajor)
                .to_bits(),
            0x1A32
        );
    }

    #[test]
    fn unknown_bits_rejected() {
        assert_eq!(
            TypeTag::from_bits(0x0001_0000),
            Err(StructureError::UnrecognisedBits { bits: 0x0001_0000 })
        );
        assert!(TypeTag::from_bits(0x0300).is_err());
        assert!(TypeTag::from_bits(0x0015).is_err());
    }

    #[test]
    fn widths() {
        assert_eq!(ElementKind::Bool8.width(), Some(1));
        assert_eq!(ElementKind::Char16.width(), Some(2));
        assert_eq!(ElementKind::Float32.width(), Some(4));
        assert_eq!(ElementKind::UInt64.width(), Some(8));
        assert_eq!(ElementKind::Cell.width(), None);
    }

    #[test]
    fn multiplier_requires_complexity() {
        let tag = TypeTag {
            element: Some(ElementKind::Float64),
            ..TypeTag::unspecified()
        };
        assert_eq!(tag.complex_multiplier(), Err(StructureError::ComplexityUnspecified));
        assert_eq!(TypeTag::complex(ElementKind::Int8).complex_multiplier(), Ok(2));
    }

    #[test]
    fn names_roundtrip_for_array_kinds() {
        for kind in ElementKind::ARRAY_KINDS {
            assert_eq!(ElementKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ElementKind::from_name("CHAR16"), None);
    }
}
