//! Lazily built complex-layout conversions.
//!
//! A complex array is stored in one physical layout. Readers that want
//! the other layout are served from a secondary buffer, built on first
//! request and reused until the content changes. Each target layout has
//! its own slot.
//!
//! # Concurrency
//!
//! Readers share `&ConversionCache`. A slot's buffer is held in a
//! [`OnceLock`]: the first reader to need it runs the conversion while
//! any concurrent readers of the same slot block, and every reader then
//! sees the same bytes. Invalidation takes `&mut self`, so it can never
//! overlap a read. The previous generation's allocation is kept and
//! reused by the next conversion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use numerus_core::ComplexLayout;
use tracing::trace;

#[derive(Debug, Default)]
struct Slot {
    ready: OnceLock<Vec<u8>>,
    spare: Mutex<Vec<u8>>,
}

impl Slot {
    fn invalidate(&mut self) {
        if let Some(buf) = self.ready.take() {
            *self.spare.get_mut().unwrap_or_else(PoisonError::into_inner) = buf;
        }
    }

    fn take_spare(&self) -> Vec<u8> {
        std::mem::take(&mut *self.spare.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Secondary buffers for the two complex layouts.
#[derive(Debug, Default)]
pub struct ConversionCache {
    adjacent: Slot,
    interleaved: Slot,
    conversions: AtomicUsize,
}

impl ConversionCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, target: ComplexLayout) -> &Slot {
        match target {
            ComplexLayout::Adjacent => &self.adjacent,
            ComplexLayout::Interleaved => &self.interleaved,
        }
    }

    /// `source` converted to `target`.
    ///
    /// `source` is the whole stored block, in the layout opposite to
    /// `target`. The conversion runs at most once per generation.
    pub fn view(&self, target: ComplexLayout, source: &[u8], bytes_per_element: usize) -> &[u8] {
        let slot = self.slot(target);
        slot.ready.get_or_init(|| {
            let mut buf = slot.take_spare();
            buf.clear();
            buf.resize(source.len(), 0);
            match target {
                ComplexLayout::Interleaved => {
                    let (re, im) = source.split_at(source.len() / 2);
                    interleave(bytes_per_element, re, im, &mut buf);
                }
                ComplexLayout::Adjacent => {
                    let (re, im) = buf.split_at_mut(source.len() / 2);
                    deinterleave(bytes_per_element, source, re, im);
                }
            }
            self.conversions.fetch_add(1, Ordering::Relaxed);
            trace!(?target, bytes = source.len(), "converted complex layout");
            buf
        })
    }

    /// `true` if `target` holds an up-to-date conversion.
    pub fn is_current(&self, target: ComplexLayout) -> bool {
        self.slot(target).ready.get().is_some()
    }

    /// Mark both slots stale. Allocations are kept for reuse.
    pub fn invalidate(&mut self) {
        self.adjacent.invalidate();
        self.interleaved.invalidate();
    }

    /// Number of conversions performed over the cache's lifetime.
    pub fn conversions(&self) -> usize {
        self.conversions.load(Ordering::Relaxed)
    }
}

// ── Width-dispatched copy loops ─────────────────────────────────

#[inline(always)]
fn interleave_by(w: usize, real: &[u8], imag: &[u8], dst: &mut [u8]) {
    for ((d, r), i) in dst
        .chunks_exact_mut(2 * w)
        .zip(real.chunks_exact(w))
        .zip(imag.chunks_exact(w))
    {
        d[..w].copy_from_slice(r);
        d[w..].copy_from_slice(i);
    }
}

#[inline(always)]
fn deinterleave_by(w: usize, src: &[u8], real: &mut [u8], imag: &mut [u8]) {
    for ((s, r), i) in src
        .chunks_exact(2 * w)
        .zip(real.chunks_exact_mut(w))
        .zip(imag.chunks_exact_mut(w))
    {
        r.copy_from_slice(&s[..w]);
        i.copy_from_slice(&s[w..]);
    }
}

/// Interleave two channels of `width`-byte elements into `dst`:
/// `real[e] → dst[2e]`, `imag[e] → dst[2e + 1]`.
pub fn interleave(width: usize, real: &[u8], imag: &[u8], dst: &mut [u8]) {
    match width {
        1 => interleave_by(1, real, imag, dst),
        2 => interleave_by(2, real, imag, dst),
        4 => interleave_by(4, real, imag, dst),
        8 => interleave_by(8, real, imag, dst),
        0 => {}
        w => interleave_by(w, real, imag, dst),
    }
}

/// Split interleaved `src` into two channels:
/// `src[2e] → real[e]`, `src[2e + 1] → imag[e]`.
pub fn deinterleave(width: usize, src: &[u8], real: &mut [u8], imag: &mut [u8]) {
    match width {
        1 => deinterleave_by(1, src, real, imag),
        2 => deinterleave_by(2, src, real, imag),
        4 => deinterleave_by(4, src, real, imag),
        8 => deinterleave_by(8, src, real, imag),
        0 => {}
        w => deinterleave_by(w, src, real, imag),
    }
}

/// An adjacent block (all real, then all imaginary) in interleaved order.
pub fn to_interleaved(width: usize, adjacent: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; adjacent.len()];
    let (re, im) = adjacent.split_at(adjacent.len() / 2);
    interleave(width, re, im, &mut out);
    out
}

/// An interleaved block in adjacent order.
pub fn to_adjacent(width: usize, interleaved: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; interleaved.len()];
    let (re, im) = out.split_at_mut(interleaved.len() / 2);
    deinterleave(width, interleaved, re, im);
    out
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ConversionCache>();
};
