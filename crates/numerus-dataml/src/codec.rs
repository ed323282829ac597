//! Raw array encode/decode between byte buffers and DataML nodes.
//!
//! Buffers hold native-endian elements. Complex data is passed either as
//! one block in the array's own layout (`imag = None`) or, for adjacent
//! layout only, as separate real and imaginary channels.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use numerus_core::{
    ComplexLayout, Element, ElementVisitor, Shape, ShapeSpec, StructureError, TypeTag,
};
use tracing::debug;

use crate::class::class_code;
use crate::context::{CodecContext, Precision};
use crate::error::DataMlError;
use crate::format::{format_scalar, normalize_legacy_specials};
use crate::info::{NodeInfo, Storage};
use crate::node::DataMlNode;
use crate::scan::{self, Scanner};

// ── Channel checks ──────────────────────────────────────────────

struct Layout {
    bytes_per_element: usize,
    elements_real: usize,
    bytes_real: usize,
    complex: bool,
    interleaved: bool,
}

impl Layout {
    fn new(tag: &TypeTag, shape: &Shape, node: &str) -> Result<Self, DataMlError> {
        let wrap = |e| DataMlError::structure(node, e);
        let bytes_per_element = tag.bytes_per_element().map_err(wrap)?;
        let complex = tag.complex_multiplier().map_err(wrap)? == 2;
        let elements_real = numerus_core::element_count_real(shape).map_err(wrap)?;
        let bytes_real = elements_real
            .checked_mul(bytes_per_element)
            .ok_or(StructureError::Overflow)
            .map_err(wrap)?;
        Ok(Self {
            bytes_per_element,
            elements_real,
            bytes_real,
            complex,
            interleaved: complex && tag.layout == Some(ComplexLayout::Interleaved),
        })
    }

    fn bytes_total(&self) -> usize {
        if self.complex {
            self.bytes_real * 2
        } else {
            self.bytes_real
        }
    }

    /// Check buffer sizes against this layout.
    fn check(&self, node: &str, real: usize, imag: Option<usize>) -> Result<(), DataMlError> {
        let expect = |expected: usize, actual: usize| {
            if expected == actual {
                Ok(())
            } else {
                Err(DataMlError::SizeMismatch {
                    node: node.to_string(),
                    expected,
                    actual,
                })
            }
        };
        match (self.complex, imag) {
            (false, Some(_)) => Err(DataMlError::ComplexMismatch {
                node: node.to_string(),
                detail: "imaginary data supplied but data is real",
            }),
            (true, Some(_)) if self.interleaved => Err(DataMlError::ComplexMismatch {
                node: node.to_string(),
                detail: "complex (interleaved) data should be supplied in a single block",
            }),
            (true, Some(im)) => {
                expect(self.bytes_real, real)?;
                expect(self.bytes_real, im)
            }
            (_, None) => expect(self.bytes_total(), real),
        }
    }
}

/// Split a destination into the channels text and binary modes fill in
/// turn: a second channel exists only for adjacent complex data.
fn channels<'a>(
    layout: &Layout,
    real: &'a mut [u8],
    imag: Option<&'a mut [u8]>,
) -> (&'a mut [u8], Option<&'a mut [u8]>) {
    match imag {
        Some(im) => (real, Some(im)),
        None if layout.complex && !layout.interleaved => {
            let (re, im) = real.split_at_mut(layout.bytes_real);
            (re, Some(im))
        }
        None => (real, None),
    }
}

// ── Decode ──────────────────────────────────────────────────────

struct Fill<'s, 't, 'o> {
    scanner: &'s mut Scanner<'t>,
    out: &'o mut [u8],
    node: &'o str,
    index: usize,
    expected: usize,
}

impl ElementVisitor for Fill<'_, '_, '_> {
    type Output = Result<(), DataMlError>;

    fn visit<T: Element>(self) -> Self::Output {
        scan::fill::<T>(self.scanner, self.out, self.node, self.index, self.expected)
    }
}

/// Decode the values of `node` into `real` (and `imag`).
///
/// `real` receives the whole block unless `imag` is given, in which
/// case the node must hold adjacent complex data and each buffer takes
/// one channel. Buffer sizes must match the node exactly.
pub fn get_raw(
    node: &DataMlNode,
    ctx: &CodecContext,
    real: &mut [u8],
    imag: Option<&mut [u8]>,
) -> Result<(), DataMlError> {
    let name = node.name();
    let info = NodeInfo::from_node(node)?;
    if info.is_composite() {
        return Err(DataMlError::CannotFill {
            node: name.to_string(),
        });
    }
    let layout = Layout::new(&info.tag, &info.shape, name)?;
    layout.check(name, real.len(), imag.as_ref().map(|b| b.len()))?;
    let (re, im) = channels(&layout, real, imag);

    match info.storage {
        Storage::String => {
            for (unit, chunk) in node.text().encode_utf16().zip(re.chunks_exact_mut(2)) {
                unit.write_ne(chunk);
            }
            Ok(())
        }
        Storage::BinaryFile => read_binary_file(node, ctx, &info, &layout, re, im),
        Storage::Text => {
            let text = normalize_legacy_specials(node.text());
            let mut scanner = Scanner::new(&text);
            let expected = layout.elements_real * if layout.complex { 2 } else { 1 };
            let element = info.element();
            let first = Fill {
                scanner: &mut scanner,
                out: re,
                node: name,
                index: 0,
                expected,
            };
            element
                .visit(first)
                .ok_or_else(|| DataMlError::CannotFill {
                    node: name.to_string(),
                })??;
            if let Some(im) = im {
                let second = Fill {
                    scanner: &mut scanner,
                    out: im,
                    node: name,
                    index: layout.elements_real,
                    expected,
                };
                element
                    .visit(second)
                    .ok_or_else(|| DataMlError::CannotFill {
                        node: name.to_string(),
                    })??;
            }
            scan::finish(&scanner, name)
        }
    }
}

fn read_binary_file(
    node: &DataMlNode,
    ctx: &CodecContext,
    info: &NodeInfo,
    layout: &Layout,
    re: &mut [u8],
    im: Option<&mut [u8]>,
) -> Result<(), DataMlError> {
    let path = ctx.resolve(node.text().trim());
    let file = File::open(&path).map_err(|e| DataMlError::io_at(&path, e))?;
    let actual = file
        .metadata()
        .map_err(|e| DataMlError::io_at(&path, e))?
        .len();
    let expected = layout.bytes_total() as u64;
    if actual != expected {
        return Err(DataMlError::FileSize {
            path,
            expected,
            actual,
        });
    }
    debug!(path = %path.display(), bytes = expected, node = node.name(), "reading binary data file");

    let mut r = BufReader::new(file);
    match im {
        None => r.read_exact(re).map_err(|e| DataMlError::io_at(&path, e))?,
        Some(im) => {
            let chunk = chunk_bytes(layout.bytes_per_element, &info.shape)
                .map_err(|e| DataMlError::structure(node.name(), e))?;
            if chunk > 0 {
                for (r_chunk, i_chunk) in re.chunks_mut(chunk).zip(im.chunks_mut(chunk)) {
                    r.read_exact(r_chunk)
                        .map_err(|e| DataMlError::io_at(&path, e))?;
                    r.read_exact(i_chunk)
                        .map_err(|e| DataMlError::io_at(&path, e))?;
                }
            }
        }
    }
    Ok(())
}

/// Bytes in one step of the last dimension:
/// `bytes_per_element × product(all dims but the last)`.
pub fn chunk_bytes(bytes_per_element: usize, shape: &Shape) -> Result<usize, StructureError> {
    let leading = usize::try_from(shape.leading_count()?).map_err(|_| StructureError::Overflow)?;
    leading
        .checked_mul(bytes_per_element)
        .ok_or(StructureError::Overflow)
}

/// Write array data in binary-file order.
///
/// With an imaginary channel, each step of the last dimension writes its
/// real chunk and then its imaginary chunk. Otherwise `real` is written
/// as is.
pub fn write_binary(
    w: &mut dyn Write,
    chunk_bytes: usize,
    real: &[u8],
    imag: Option<&[u8]>,
) -> Result<(), DataMlError> {
    match imag {
        None => w.write_all(real)?,
        Some(_) if chunk_bytes == 0 => {}
        Some(im) => {
            for (r, i) in real.chunks(chunk_bytes).zip(im.chunks(chunk_bytes)) {
                w.write_all(r)?;
                w.write_all(i)?;
            }
        }
    }
    Ok(())
}

// ── Encode ──────────────────────────────────────────────────────

struct Render<'a> {
    bytes: &'a [u8],
    precision: Precision,
    out: &'a mut String,
}

impl ElementVisitor for Render<'_> {
    type Output = ();

    fn visit<T: Element>(self) {
        for chunk in self.bytes.chunks_exact(T::WIDTH) {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            self.out
                .push_str(&format_scalar(T::read_ne(chunk).to_scalar(), self.precision));
        }
    }
}

fn write_class_and_dims(
    node: &mut DataMlNode,
    tag: &TypeTag,
    shape: &Shape,
    layout: &Layout,
) -> Result<(), DataMlError> {
    let element = tag
        .element
        .ok_or_else(|| DataMlError::structure(node.name(), StructureError::ElementUnspecified))?;
    let complexity = tag
        .complexity
        .ok_or_else(|| DataMlError::structure(node.name(), StructureError::ComplexityUnspecified))?;
    node.clear();
    node.set_attribute("c", class_code(element, complexity, tag.layout));
    if layout.elements_real != 1 {
        node.set_attribute("b", shape.to_string());
    }
    Ok(())
}

/// Encode an array into `node` as inline text.
///
/// The node is cleared first. `b` is omitted when the array holds
/// exactly one real element. Adjacent complex data is written as all
/// real values followed by all imaginary values.
pub fn set_raw(
    node: &mut DataMlNode,
    tag: &TypeTag,
    shape: &Shape,
    real: &[u8],
    imag: Option<&[u8]>,
    precision: Precision,
) -> Result<(), DataMlError> {
    let layout = Layout::new(tag, shape, node.name())?;
    layout.check(node.name(), real.len(), imag.map(<[u8]>::len))?;
    let element = tag
        .element
        .ok_or_else(|| DataMlError::structure(node.name(), StructureError::ElementUnspecified))?;

    let mut text = String::new();
    for bytes in std::iter::once(real).chain(imag) {
        let render = Render {
            bytes,
            precision,
            out: &mut text,
        };
        element.visit(render).ok_or_else(|| DataMlError::CannotFill {
            node: node.name().to_string(),
        })?;
    }
    write_class_and_dims(node, tag, shape, &layout)?;
    node.set_text(text);
    Ok(())
}

/// Point `node` at a binary file holding the array. The file itself is
/// written separately (see [`write_binary`]).
pub fn set_binary_file(
    node: &mut DataMlNode,
    tag: &TypeTag,
    shape: &Shape,
    path: &Path,
    ctx: &CodecContext,
) -> Result<(), DataMlError> {
    let layout = Layout::new(tag, shape, node.name())?;
    write_class_and_dims(node, tag, shape, &layout)?;
    node.set_attribute("s", "b");
    node.set_text(ctx.relativize(path));
    Ok(())
}

/// Validate the structure a node declares.
pub fn validate(
    node: &DataMlNode,
    requested: &TypeTag,
    shape: &ShapeSpec,
) -> Result<NodeInfo, DataMlError> {
    let info = NodeInfo::from_node(node)?;
    numerus_core::validate_structure(node.name(), &info.tag, &info.shape, requested, shape)?;
    Ok(info)
}
