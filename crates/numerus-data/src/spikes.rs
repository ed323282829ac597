//! The spike-train data object.
//!
//! [`SpikesData`] holds, per tick, the indices of the elements of an
//! n-dimensional source that fired. Its dimensions fix a capacity equal
//! to their product; at most that many indices can be held, and every
//! index must address an element. Content is stored as native-endian
//! `INT32` behind the host header, so the transport block is always
//! header plus the held indices.

use numerus_core::{
    decode_slice, encode_slice, ComplexLayout, ContentError, ElementKind, MemoryOrder, Shape,
    StructureError, TypeTag,
};
use numerus_dataml::scan::Scanner;
use numerus_dataml::{become_struct, field_mut, set_array, CodecContext, DataMlNode, Precision};
use tracing::debug;

use crate::buffer::BufferStore;
use crate::config::{LogConfig, LogTerm};
use crate::error::DataError;
use crate::traits::{DataObject, StateSet};

/// Class name reported to hosts.
pub const SPIKES_CLASS: &str = "std/2009/data/spikes";

const INDEX_BYTES: usize = std::mem::size_of::<i32>();

/// Fields of the struct node written at log term, in order.
pub const LOG_FIELDS: [&str; 7] = ["version", "meta", "fS", "dims", "t", "s", "ts"];

/// A variable-length list of firing indices.
#[derive(Debug)]
pub struct SpikesData {
    dims: Shape,
    capacity: usize,
    count: usize,
    buffer: BufferStore,
    log: Option<SpikeLog>,
}

/// Chronological `(tick, index)` pairs.
#[derive(Debug, Default)]
struct SpikeLog {
    events: Vec<i32>,
    ticks: u64,
}

fn tick_value(tick: u64) -> Result<i32, StructureError> {
    i32::try_from(tick).map_err(|_| StructureError::Overflow)
}

impl SpikesData {
    /// An object of dimensions `[0]`, holding nothing.
    pub fn new() -> Self {
        Self {
            dims: Shape::from([0]),
            capacity: 0,
            count: 0,
            buffer: BufferStore::new(),
            log: None,
        }
    }

    /// An empty object of the given dimensions.
    pub fn with_dims(dims: Shape) -> Result<Self, StructureError> {
        let mut s = Self::new();
        s.set_dims(dims)?;
        Ok(s)
    }

    /// Dimensions of the source.
    pub fn dims(&self) -> &Shape {
        &self.dims
    }

    /// Most indices the object can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Indices currently held.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Set the dimensions. Capacity becomes their product and the
    /// object is emptied.
    pub fn set_dims(&mut self, dims: Shape) -> Result<(), StructureError> {
        let capacity = numerus_core::element_count_real(&dims)?;
        if i32::try_from(capacity).is_err() {
            return Err(StructureError::Overflow);
        }
        let bytes = capacity
            .checked_mul(INDEX_BYTES)
            .ok_or(StructureError::Overflow)?;
        self.buffer.resize(bytes);
        self.capacity = capacity;
        self.count = 0;
        debug!(dims = %dims.comma_string(), capacity, "spike dimensions set");
        self.dims = dims;
        Ok(())
    }

    /// The held indices.
    pub fn spikes(&self) -> Vec<i32> {
        decode_slice(&self.buffer.data()[..self.count * INDEX_BYTES])
    }

    /// Replace the held indices.
    ///
    /// Nothing is copied unless every index fits: more indices than the
    /// capacity, or an index outside `0..capacity`, leaves the previous
    /// content in place.
    pub fn set_content(&mut self, spikes: &[i32]) -> Result<(), ContentError> {
        if spikes.len() > self.capacity {
            return Err(ContentError::CapacityExceeded {
                count: spikes.len(),
                capacity: self.capacity,
            });
        }
        if let Some(&bad) = spikes
            .iter()
            .find(|&&i| usize::try_from(i).map_or(true, |i| i >= self.capacity))
        {
            return Err(ContentError::ItemOutOfRange {
                index: bad.into(),
                capacity: self.capacity,
            });
        }
        let bytes = encode_slice(spikes);
        self.buffer.data_mut()[..bytes.len()].copy_from_slice(&bytes);
        self.count = spikes.len();
        Ok(())
    }

    fn parse_dims(text: &str) -> Option<Shape> {
        Shape::parse_comma(text)
            .ok()
            .filter(|dims| dims.comma_string() == text)
    }

    // ── Logging ─────────────────────────────────────────────────

    /// Start logging. Spike logs are always laid in inline, so only the
    /// sample count is used, to reserve memory.
    pub fn log_init(&mut self, config: &LogConfig) {
        let mut log = SpikeLog::default();
        let guess = usize::try_from(config.expected_samples).unwrap_or(0);
        if log.events.try_reserve(guess.saturating_mul(2)).is_err() {
            debug!(samples = guess, "spike log reservation skipped");
        }
        self.log = Some(log);
    }

    /// Record one tick's indices, from `source` or from this object.
    pub fn log_service(&mut self, source: Option<&SpikesData>) -> Result<(), DataError> {
        let spikes = source.unwrap_or(&*self).spikes();
        let log = self.log.as_mut().ok_or(ContentError::NotLogging)?;
        let tick = tick_value(log.ticks)?;
        for index in spikes {
            log.events.push(tick);
            log.events.push(index);
        }
        log.ticks += 1;
        Ok(())
    }

    /// Close the log and lay it into `node` as a scalar struct with
    /// fields [`LOG_FIELDS`].
    pub fn log_term(&mut self, node: &mut DataMlNode, term: &LogTerm) -> Result<(), DataError> {
        let log = self.log.take().ok_or(ContentError::NotLogging)?;
        let p = term.precision;
        let scalar = Shape::scalar();

        become_struct(node, &scalar, &LOG_FIELDS)?;
        set_array(field_mut(node, "version", 0)?, &scalar, &[1.0f64], p)?;
        become_struct(field_mut(node, "meta", 0)?, &scalar, &[])?;
        set_array(field_mut(node, "fS", 0)?, &scalar, &[term.sample_rate], p)?;

        let dims: Vec<f64> = self.dims.dims().iter().map(|&d| d as f64).collect();
        let rank = dims.len() as u64;
        set_array(field_mut(node, "dims", 0)?, &Shape::from([1, rank]), &dims, p)?;

        let pair = Shape::from([1, 2]);
        let ticks = tick_value(log.ticks)?;
        set_array(field_mut(node, "t", 0)?, &pair, &[0, ticks], p)?;
        let capacity = tick_value(self.capacity as u64)?;
        set_array(field_mut(node, "s", 0)?, &pair, &[0, capacity], p)?;

        let events = (log.events.len() / 2) as u64;
        set_array(field_mut(node, "ts", 0)?, &Shape::from([2, events]), &log.events, p)?;

        node.set_root_tags(p, &term.tool, &term.tool_version);
        debug!(ticks = log.ticks, events, "laid spike log in");
        Ok(())
    }
}

impl Default for SpikesData {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies dimensions, header reservation and held indices; never the log.
impl Clone for SpikesData {
    fn clone(&self) -> Self {
        Self {
            dims: self.dims.clone(),
            capacity: self.capacity,
            count: self.count,
            buffer: self.buffer.clone(),
            log: None,
        }
    }
}

impl DataObject for SpikesData {
    fn class_name(&self) -> &'static str {
        SPIKES_CLASS
    }

    fn init_complete(&mut self, header_bytes: usize) {
        if header_bytes != 0 {
            self.buffer.set_header_bytes(header_bytes);
        }
    }

    fn transport_stream(&self) -> &[u8] {
        &self.buffer.stream()[..self.buffer.header_bytes() + self.count * INDEX_BYTES]
    }

    fn set_transport_content(&mut self, stream: &[u8]) -> Result<(), DataError> {
        if stream.len() % INDEX_BYTES != 0 {
            return Err(ContentError::StreamLength {
                expected: stream.len() / INDEX_BYTES * INDEX_BYTES,
                actual: stream.len(),
            }
            .into());
        }
        self.set_content(&decode_slice::<i32>(stream))?;
        Ok(())
    }

    /// Precision is ignored; indices are written exactly.
    fn state_get(&self, _precision: Precision) -> Result<DataMlNode, DataError> {
        let mut node = DataMlNode::new(crate::numeric::STATE_NODE);
        node.set_attribute("Dims", self.dims.comma_string());
        node.set_attribute("Count", self.count.to_string());
        let text: Vec<String> = self.spikes().iter().map(i32::to_string).collect();
        node.set_text(text.join(" "));
        Ok(node)
    }

    fn state_set(&mut self, state: StateSet<'_>, _ctx: &CodecContext) -> Result<(), DataError> {
        let node = match state {
            StateSet::Undefined | StateSet::Zero => {
                self.count = 0;
                return Ok(());
            }
            StateSet::Node(node) => node,
        };
        let bad = |detail: String| DataError::BadState { detail };

        let text = node
            .attribute("Dims")
            .ok_or_else(|| bad("missing Dims".into()))?;
        let dims =
            Self::parse_dims(text).ok_or_else(|| bad(format!("bad Dims \"{text}\"")))?;
        let count_text = node
            .attribute("Count")
            .ok_or_else(|| bad("missing Count".into()))?;
        let count: usize = count_text
            .parse()
            .map_err(|_| bad(format!("bad Count \"{count_text}\"")))?;

        let mut scanner = Scanner::new(node.text());
        let mut spikes = Vec::with_capacity(count.min(1 << 16));
        for n in 0..count {
            let token = scanner
                .next_token()
                .ok_or_else(|| bad(format!("expected {count} indices, found {n}")))?;
            let index = token
                .starts_with(|c: char| c.is_ascii_digit())
                .then(|| token.parse::<i32>().ok())
                .flatten()
                .ok_or_else(|| bad(format!("bad index \"{token}\"")))?;
            spikes.push(index);
        }
        if !scanner.remaining().trim().is_empty() {
            return Err(bad(format!("more than {count} indices")));
        }

        self.set_dims(dims)?;
        self.set_content(&spikes)?;
        Ok(())
    }

    fn generic_structure(&self, _request: &TypeTag) -> String {
        self.dims.comma_string()
    }

    fn set_generic_structure(&mut self, text: &str, base: &TypeTag) -> Result<TypeTag, DataError> {
        let dims = Self::parse_dims(text)
            .ok_or_else(|| DataError::generic(text, "dimensions do not round-trip"))?;
        self.set_dims(dims)?;
        Ok(TypeTag {
            layout: base.layout,
            order: base.order,
            ..TypeTag::real(ElementKind::Int32)
        })
    }

    fn duplicate(&self) -> Box<dyn DataObject> {
        Box::new(self.clone())
    }
}

impl SpikesData {
    /// The type hosts see for generic content access.
    pub fn content_type(&self) -> TypeTag {
        TypeTag::real(ElementKind::Int32)
            .with_layout(ComplexLayout::Adjacent)
            .with_order(MemoryOrder::ColumnMajor)
    }
}
