//! Contiguous content storage with a host header reservation.
//!
//! ```text
//! [ header (header_bytes) | data (data_len) ]
//! ```
//!
//! The host may ask for a number of bytes in front of the content so it
//! can send header and content as a single transport block. The header
//! is always zero; the data region starts immediately after it.

use tracing::debug;

/// Owned `header + data` byte block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferStore {
    bytes: Vec<u8>,
    header: usize,
}

impl BufferStore {
    /// An empty store with no header reservation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes reserved in front of the data.
    pub fn header_bytes(&self) -> usize {
        self.header
    }

    /// Length of the data region.
    pub fn data_len(&self) -> usize {
        self.bytes.len() - self.header
    }

    /// Resize the data region to `data_bytes`. Existing content is
    /// discarded; the data region reads as zero afterwards.
    pub fn resize(&mut self, data_bytes: usize) {
        self.bytes.clear();
        self.bytes.resize(self.header + data_bytes, 0);
    }

    /// Change the header reservation, keeping the data region's
    /// content. The header is zeroed.
    pub fn set_header_bytes(&mut self, header: usize) {
        if header == self.header {
            return;
        }
        let data = self.data_len();
        let old = self.header;
        if header > old {
            self.bytes.resize(header + data, 0);
            self.bytes.copy_within(old..old + data, header);
        } else {
            self.bytes.copy_within(old..old + data, header);
            self.bytes.truncate(header + data);
        }
        self.bytes[..header].fill(0);
        self.header = header;
        debug!(header, data, "relocated content behind header");
    }

    /// The data region.
    pub fn data(&self) -> &[u8] {
        &self.bytes[self.header..]
    }

    /// The data region, mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.header..]
    }

    /// Header and data as one block.
    pub fn stream(&self) -> &[u8] {
        &self.bytes
    }
}
