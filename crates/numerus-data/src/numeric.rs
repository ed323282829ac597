//! The numeric array data object.
//!
//! [`NumericData`] holds one typed, possibly complex, n-dimensional
//! array. Content lives in a [`BufferStore`] in the object's physical
//! layout; readers asking for the other complex layout are served from
//! the [`ConversionCache`].
//!
//! # Phases
//!
//! Writes take `&mut self` and invalidate the cache. Reads take `&self`
//! and may run concurrently; a conversion needed by several readers
//! runs once.

use numerus_core::{
    decode_slice, encode_slice, validate_structure, validate_type, ComplexLayout, ContentError,
    Element, ElementVisitor, MemoryOrder, Shape, ShapeSpec, Structure, StructureError, TypeTag,
    ValidationError,
};
use numerus_dataml::{get_raw, set_raw, CodecContext, DataMlNode, NodeInfo, Precision};
use tracing::debug;

use crate::buffer::BufferStore;
use crate::config::{LogConfig, LogTerm};
use crate::convert::ConversionCache;
use crate::error::DataError;
use crate::generic;
use crate::log::NumericLog;
use crate::traits::{DataObject, StateSet};

/// Class name reported to hosts.
pub const NUMERIC_CLASS: &str = "std/2009/data/numeric";

/// Name of the node produced by [`NumericData::state_get`].
pub const STATE_NODE: &str = "State";

/// Content as seen by a reader.
///
/// `real` holds the whole block when `imag` is `None` (real data or
/// interleaved complex data). `bytes` is always the byte count of one
/// channel.
#[derive(Clone, Copy, Debug)]
pub struct ContentView<'a> {
    /// Real channel, or the whole block.
    pub real: &'a [u8],
    /// Imaginary channel, for adjacent complex views.
    pub imag: Option<&'a [u8]>,
    /// Bytes in one channel.
    pub bytes: usize,
    /// Layout of the view; `None` for real data.
    pub layout: Option<ComplexLayout>,
    /// `true` if the view was served from a conversion buffer.
    pub converted: bool,
}

/// Content as seen by a writer, always in the stored layout.
#[derive(Debug)]
pub struct ContentViewMut<'a> {
    /// Real channel, or the whole block.
    pub real: &'a mut [u8],
    /// Imaginary channel, for adjacent complex content.
    pub imag: Option<&'a mut [u8]>,
    /// Bytes in one channel.
    pub bytes: usize,
}

/// A typed n-dimensional numeric array.
#[derive(Debug)]
pub struct NumericData {
    structure: Structure,
    buffer: BufferStore,
    cache: ConversionCache,
    log: Option<NumericLog>,
}

impl NumericData {
    /// A real `DOUBLE` array of shape `[0]`.
    pub fn new() -> Self {
        Self {
            structure: Structure::placeholder(),
            buffer: BufferStore::new(),
            cache: ConversionCache::new(),
            log: None,
        }
    }

    /// An array of the given structure, zero filled.
    pub fn with_structure(tag: TypeTag, shape: Shape) -> Result<Self, StructureError> {
        let mut data = Self::new();
        data.set_structure(tag, shape)?;
        Ok(data)
    }

    // ── Structure ───────────────────────────────────────────────

    /// The current structure.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Retype and reshape. Content is discarded and reads as zero.
    ///
    /// The element kind must be one of the numeric array kinds and the
    /// complexity must be given. Layout defaults to adjacent and order
    /// to column-major; row-major is rejected.
    pub fn set_structure(&mut self, tag: TypeTag, shape: Shape) -> Result<(), StructureError> {
        let structure = Structure::resolve(tag, shape)?;
        self.buffer.resize(structure.bytes_total());
        self.cache.invalidate();
        debug!(structure = %structure, "structure set");
        self.structure = structure;
        Ok(())
    }

    /// Check the type against `requested`, naming `subject` on failure.
    pub fn validate_type(&self, subject: &str, requested: &TypeTag) -> Result<(), ValidationError> {
        validate_type(subject, &self.structure.tag(), requested)
    }

    /// Check type and shape against a requested pattern.
    pub fn validate_structure(
        &self,
        subject: &str,
        requested: &TypeTag,
        shape: &ShapeSpec,
    ) -> Result<(), ValidationError> {
        validate_structure(
            subject,
            &self.structure.tag(),
            self.structure.shape(),
            requested,
            shape,
        )
    }

    // ── Content ─────────────────────────────────────────────────

    /// Replace the content.
    ///
    /// Without `imag`, `real` must hold the whole block in the stored
    /// layout. With `imag`, the object must be complex adjacent and
    /// each slice holds one channel.
    pub fn set_content(&mut self, real: &[u8], imag: Option<&[u8]>) -> Result<(), ContentError> {
        let s = &self.structure;
        let expected = if imag.is_some() {
            s.bytes_real()
        } else {
            s.bytes_total()
        };
        if real.is_empty() && expected != 0 {
            return Err(ContentError::MissingReal);
        }
        match imag {
            None => {
                if real.len() != expected {
                    return Err(ContentError::ByteCountMismatch {
                        expected,
                        actual: real.len(),
                    });
                }
                self.buffer.data_mut().copy_from_slice(real);
            }
            Some(im) => {
                if !s.is_complex() {
                    return Err(ContentError::ImagOnRealObject);
                }
                if s.is_interleaved() {
                    return Err(ContentError::SplitInterleaved);
                }
                for len in [real.len(), im.len()] {
                    if len != expected {
                        return Err(ContentError::ByteCountMismatch {
                            expected,
                            actual: len,
                        });
                    }
                }
                let (re, dst_im) = self.buffer.data_mut().split_at_mut(expected);
                re.copy_from_slice(real);
                dst_im.copy_from_slice(im);
            }
        }
        self.cache.invalidate();
        Ok(())
    }

    fn check_element<T: Element>(&self) -> Result<(), ValidationError> {
        if T::backs(self.structure.element()) {
            return Ok(());
        }
        self.validate_type("content", &TypeTag {
            element: Some(T::KIND),
            ..TypeTag::unspecified()
        })
    }

    /// Replace the content from typed values. `T` must be the primitive
    /// that stores the object's element kind (`u8` for `Bool8`).
    pub fn set_values<T: Element>(&mut self, real: &[T], imag: Option<&[T]>) -> Result<(), DataError> {
        self.check_element::<T>()?;
        let imag = imag.map(encode_slice);
        self.set_content(&encode_slice(real), imag.as_deref())?;
        Ok(())
    }

    /// Read the content, in the layout `request` asks for.
    ///
    /// Only the layout and order of `request` are consulted. Real data,
    /// an unspecified layout or the stored layout are served directly;
    /// the other complex layout is converted once per content change.
    pub fn content(&self, request: &TypeTag) -> Result<ContentView<'_>, ContentError> {
        if request.order == Some(MemoryOrder::RowMajor) {
            return Err(ContentError::RowMajorRequest);
        }
        let s = &self.structure;
        let data = self.buffer.data();
        if !s.is_complex() {
            return Ok(ContentView {
                real: data,
                imag: None,
                bytes: s.bytes_real(),
                layout: None,
                converted: false,
            });
        }
        let stored = s.layout();
        let target = request.layout.unwrap_or(stored);
        if target == stored {
            return Ok(self.view(data, stored, false));
        }
        let converted = self.cache.view(target, data, s.bytes_per_element());
        Ok(self.view(converted, target, true))
    }

    fn view<'a>(&self, block: &'a [u8], layout: ComplexLayout, converted: bool) -> ContentView<'a> {
        let bytes = self.structure.bytes_real();
        let (real, imag) = match layout {
            ComplexLayout::Adjacent => {
                let (re, im) = block.split_at(bytes);
                (re, Some(im))
            }
            ComplexLayout::Interleaved => (block, None),
        };
        ContentView {
            real,
            imag,
            bytes,
            layout: Some(layout),
            converted,
        }
    }

    /// Read the content as typed values: `(real, imag)` where `imag` is
    /// present for complex data. Interleaved content is split. `T` is
    /// checked as for [`set_values`](Self::set_values).
    pub fn values<T: Element>(&self) -> Result<(Vec<T>, Option<Vec<T>>), DataError> {
        self.check_element::<T>()?;
        let view = self.content(&TypeTag::layout_request(ComplexLayout::Adjacent))?;
        Ok((decode_slice(view.real), view.imag.map(decode_slice)))
    }

    /// Mutable content in the stored layout, for a caller that will
    /// write in place. Conversions are invalidated first.
    ///
    /// Asking for a complex layout other than the stored one fails, as
    /// writes to a conversion buffer would be lost.
    pub fn content_for_write(&mut self, request: &TypeTag) -> Result<ContentViewMut<'_>, ContentError> {
        self.cache.invalidate();
        if request.order == Some(MemoryOrder::RowMajor) {
            return Err(ContentError::RowMajorRequest);
        }
        let s = &self.structure;
        let bytes = s.bytes_real();
        let complex = s.is_complex();
        let stored = s.layout();
        if complex && request.layout.is_some_and(|l| l != stored) {
            return Err(ContentError::ConvertedWrite);
        }
        let data = self.buffer.data_mut();
        if complex && stored == ComplexLayout::Adjacent {
            let (real, imag) = data.split_at_mut(bytes);
            return Ok(ContentViewMut {
                real,
                imag: Some(imag),
                bytes,
            });
        }
        Ok(ContentViewMut {
            real: data,
            imag: None,
            bytes,
        })
    }

    /// Conversions performed so far.
    pub fn conversions(&self) -> usize {
        self.cache.conversions()
    }

    // ── Logging ─────────────────────────────────────────────────

    /// Start logging this object's content.
    pub fn log_init(&mut self, config: LogConfig) -> Result<(), DataError> {
        self.log = Some(NumericLog::init(&self.structure, config)?);
        Ok(())
    }

    /// The open log, if any.
    pub fn log(&self) -> Option<&NumericLog> {
        self.log.as_ref()
    }

    /// Record one sample, from `source` or from this object.
    pub fn log_service(&mut self, source: Option<&NumericData>) -> Result<(), DataError> {
        let log = self.log.as_mut().ok_or(ContentError::NotLogging)?;
        let block = match source {
            Some(src) => src.buffer.data(),
            None => self.buffer.data(),
        };
        log.service(block)
    }

    /// Close the log and lay it into `node`.
    pub fn log_term(
        &mut self,
        node: &mut DataMlNode,
        term: &LogTerm,
        ctx: &CodecContext,
    ) -> Result<(), DataError> {
        let log = self.log.take().ok_or(ContentError::NotLogging)?;
        log.term(node, term, ctx)
    }
}

impl Default for NumericData {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies structure, header reservation and content. Conversion buffers
/// and any open log stay with the source object.
impl Clone for NumericData {
    fn clone(&self) -> Self {
        Self {
            structure: self.structure.clone(),
            buffer: self.buffer.clone(),
            cache: ConversionCache::new(),
            log: None,
        }
    }
}

struct FillUndefined<'a>(&'a mut [u8]);

impl ElementVisitor for FillUndefined<'_> {
    type Output = ();

    fn visit<T: Element>(self) {
        let v = T::from_f64(f64::NAN);
        for chunk in self.0.chunks_exact_mut(T::WIDTH) {
            v.write_ne(chunk);
        }
    }
}

impl DataObject for NumericData {
    fn class_name(&self) -> &'static str {
        NUMERIC_CLASS
    }

    fn init_complete(&mut self, header_bytes: usize) {
        if header_bytes != 0 {
            self.buffer.set_header_bytes(header_bytes);
        }
    }

    fn transport_stream(&self) -> &[u8] {
        self.buffer.stream()
    }

    fn set_transport_content(&mut self, stream: &[u8]) -> Result<(), DataError> {
        let expected = self.structure.bytes_total();
        if stream.len() != expected {
            return Err(ContentError::StreamLength {
                expected,
                actual: stream.len(),
            }
            .into());
        }
        self.buffer.data_mut().copy_from_slice(stream);
        self.cache.invalidate();
        Ok(())
    }

    fn state_get(&self, precision: Precision) -> Result<DataMlNode, DataError> {
        let mut node = DataMlNode::new(STATE_NODE);
        set_raw(
            &mut node,
            &self.structure.tag(),
            self.structure.shape(),
            self.buffer.data(),
            None,
            precision,
        )?;
        Ok(node)
    }

    fn state_set(&mut self, state: StateSet<'_>, ctx: &CodecContext) -> Result<(), DataError> {
        match state {
            StateSet::Undefined => {
                let element = self.structure.element();
                element.visit(FillUndefined(self.buffer.data_mut()));
            }
            StateSet::Zero => self.buffer.data_mut().fill(0),
            StateSet::Node(node) => {
                let info = NodeInfo::from_node(node)?;
                self.set_structure(info.tag, info.shape)?;
                get_raw(node, ctx, self.buffer.data_mut(), None)?;
            }
        }
        self.cache.invalidate();
        Ok(())
    }

    fn generic_structure(&self, request: &TypeTag) -> String {
        generic::render(&self.structure, request)
    }

    fn set_generic_structure(&mut self, text: &str, base: &TypeTag) -> Result<TypeTag, DataError> {
        let (tag, shape) = generic::parse(text, base)?;
        self.set_structure(tag, shape)?;
        Ok(self.structure.tag())
    }

    fn duplicate(&self) -> Box<dyn DataObject> {
        Box::new(self.clone())
    }
}
