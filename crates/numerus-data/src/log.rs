//! Per-tick logging of numeric content.
//!
//! A log either keeps its samples in memory or streams them to a binary
//! file. At term it is laid into one DataML node: inline text when
//! encapsulated, otherwise a reference to the binary file.
//!
//! # Storage decision
//!
//! ```text
//! stored     = expected_samples × elements_total
//! inline     = stored <= inline_threshold || config.encapsulate
//! in memory  = buffering == OnlyMemory || inline
//! ```
//!
//! A log that would have been file-backed but went inline because it
//! is small is written at full precision, so the precision a reader sees
//! does not depend on the log's length.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use numerus_core::{ContentError, Shape, Structure, StructureError};
use numerus_dataml::{
    chunk_bytes, set_binary_file, set_raw, write_binary, CodecContext, DataMlError, DataMlNode,
    Precision,
};
use tracing::{debug, warn};

use crate::config::{BufferingPolicy, LogConfig, LogTerm};
use crate::error::DataError;

#[derive(Debug)]
enum Sink {
    /// `imag` is only used for complex adjacent data.
    Memory { real: Vec<u8>, imag: Vec<u8> },
    File {
        path: PathBuf,
        writer: BufWriter<File>,
        written: usize,
    },
}

/// An open log of one numeric object.
#[derive(Debug)]
pub struct NumericLog {
    structure: Structure,
    config: LogConfig,
    encapsulated: bool,
    sink: Sink,
    count: u64,
}

fn open(path: &Path) -> Result<BufWriter<File>, DataError> {
    let file = File::create(path).map_err(|e| DataError::io_at(path, e))?;
    debug!(path = %path.display(), "opened log file");
    Ok(BufWriter::new(file))
}

fn at_path(path: &Path, e: DataMlError) -> DataError {
    match e {
        DataMlError::Io { source, .. } => DataError::io_at(path, source),
        other => other.into(),
    }
}

impl NumericLog {
    /// Start a log of content shaped like `structure`.
    pub fn init(structure: &Structure, config: LogConfig) -> Result<Self, DataError> {
        let stored = config
            .expected_samples
            .saturating_mul(structure.elements_total() as u64);
        let encapsulated = stored <= config.inline_threshold || config.encapsulate;
        let in_memory = config.buffering == BufferingPolicy::OnlyMemory || encapsulated;

        let sink = if in_memory {
            let total = usize::try_from(config.expected_samples)
                .unwrap_or(usize::MAX)
                .saturating_mul(structure.bytes_total());
            let split = structure.is_complex() && !structure.is_interleaved();
            let (real_bytes, imag_bytes) = if split {
                (total / 2, total / 2)
            } else {
                (total, 0)
            };
            let mut real = Vec::new();
            let mut imag = Vec::new();
            if real.try_reserve(real_bytes).is_err() || imag.try_reserve(imag_bytes).is_err() {
                warn!(bytes = total, "could not reserve log memory up front");
            }
            Sink::Memory { real, imag }
        } else {
            let path = config.filename.clone().ok_or(DataError::NoLogFile)?;
            let writer = open(&path)?;
            Sink::File {
                path,
                writer,
                written: 0,
            }
        };

        debug!(
            structure = %structure,
            stored,
            encapsulated,
            in_memory,
            "log initialised"
        );
        Ok(Self {
            structure: structure.clone(),
            config,
            encapsulated,
            sink,
            count: 0,
        })
    }

    /// `true` if the log will be laid in inline.
    pub fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }

    /// `true` if samples are held in memory until term.
    pub fn is_in_memory(&self) -> bool {
        matches!(self.sink, Sink::Memory { .. })
    }

    /// Samples recorded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Record one sample: the whole content block of the source.
    pub fn service(&mut self, block: &[u8]) -> Result<(), DataError> {
        let expected = self.structure.bytes_total();
        if block.len() != expected {
            return Err(ContentError::ByteCountMismatch {
                expected,
                actual: block.len(),
            }
            .into());
        }
        match &mut self.sink {
            Sink::Memory { real, imag } => {
                if self.structure.is_complex() && !self.structure.is_interleaved() {
                    let (re, im) = block.split_at(self.structure.bytes_real());
                    real.extend_from_slice(re);
                    imag.extend_from_slice(im);
                } else {
                    real.extend_from_slice(block);
                }
            }
            Sink::File {
                path,
                writer,
                written,
            } => {
                writer
                    .write_all(block)
                    .map_err(|e| DataError::io_at(path.as_path(), e))?;
                *written += block.len();
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Close the log and lay it into `node`.
    ///
    /// The node's dimensions are the content shape with the sample
    /// count appended.
    pub fn term(
        self,
        node: &mut DataMlNode,
        term: &LogTerm,
        ctx: &CodecContext,
    ) -> Result<(), DataError> {
        let Self {
            structure,
            config,
            encapsulated,
            sink,
            count,
        } = self;
        let mut dims: Shape = structure.shape().clone();
        if !dims.is_empty() {
            dims.push(count);
        }
        let tag = structure.tag();
        let split_channels = structure.is_complex() && !structure.is_interleaved();
        let mut precision = term.precision;

        match sink {
            Sink::File {
                path,
                mut writer,
                written,
            } => {
                writer.flush().map_err(|e| DataError::io_at(&path, e))?;
                if structure.bytes_total() != 0 {
                    check_bytes(&structure, count, written)?;
                }
                set_binary_file(node, &tag, &dims, &path, ctx)?;
                debug!(path = %path.display(), samples = count, "closed log file");
            }
            Sink::Memory { real, imag } if !encapsulated => {
                let path = config.filename.ok_or(DataError::NoLogFile)?;
                let mut writer = open(&path)?;
                if structure.bytes_total() != 0 {
                    check_bytes(&structure, count, real.len() + imag.len())?;
                    let chunk = chunk_bytes(structure.bytes_per_element(), &dims)?;
                    let imag = split_channels.then_some(imag.as_slice());
                    write_binary(&mut writer, chunk, &real, imag).map_err(|e| at_path(&path, e))?;
                }
                writer.flush().map_err(|e| DataError::io_at(&path, e))?;
                set_binary_file(node, &tag, &dims, &path, ctx)?;
                debug!(path = %path.display(), samples = count, "wrote buffered log file");
            }
            Sink::Memory { real, imag } => {
                if !config.encapsulate {
                    precision = Precision::NotSet;
                }
                check_bytes(&structure, count, real.len() + imag.len())?;
                let imag = split_channels.then_some(imag.as_slice());
                set_raw(node, &tag, &dims, &real, imag, precision)?;
                debug!(samples = count, "laid log in inline");
            }
        }

        node.set_root_tags(precision, &term.tool, &term.tool_version);
        Ok(())
    }
}

fn check_bytes(structure: &Structure, count: u64, actual: usize) -> Result<(), DataError> {
    let expected = usize::try_from(count)
        .ok()
        .and_then(|c| c.checked_mul(structure.bytes_total()))
        .ok_or(StructureError::Overflow)?;
    if expected != actual {
        return Err(DataError::LogByteCount { expected, actual });
    }
    Ok(())
}
