//! Log configuration.

use std::path::PathBuf;

use numerus_dataml::Precision;

/// Where a log that is not encapsulated keeps its samples while the
/// run is in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferingPolicy {
    /// Keep every sample in memory and write the file at term.
    OnlyMemory,
    /// Stream samples to the file as they arrive.
    #[default]
    AllowFile,
}

/// Parameters fixed when a log starts.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Binary file for a log that is not encapsulated.
    pub filename: Option<PathBuf>,

    /// Force the log inline regardless of its size.
    pub encapsulate: bool,

    /// Memory or file buffering for file-backed logs.
    pub buffering: BufferingPolicy,

    /// Samples the run is expected to record.
    ///
    /// Used to size buffers and to decide encapsulation.
    pub expected_samples: u64,

    /// Logs of at most this many stored elements are kept inline.
    ///
    /// Default: 1000.
    pub inline_threshold: u64,
}

impl LogConfig {
    /// Default inline threshold, in stored elements.
    pub const DEFAULT_INLINE_THRESHOLD: u64 = 1000;

    /// A config expecting `expected_samples` samples, with no file,
    /// file buffering allowed and the default threshold.
    pub fn new(expected_samples: u64) -> Self {
        Self {
            filename: None,
            encapsulate: false,
            buffering: BufferingPolicy::default(),
            expected_samples,
            inline_threshold: Self::DEFAULT_INLINE_THRESHOLD,
        }
    }

    /// Set the binary file used when the log is not encapsulated.
    pub fn with_filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.filename = Some(path.into());
        self
    }

    /// Force the log inline.
    pub fn encapsulated(mut self) -> Self {
        self.encapsulate = true;
        self
    }

    /// Set the buffering policy.
    pub fn with_buffering(mut self, buffering: BufferingPolicy) -> Self {
        self.buffering = buffering;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Parameters supplied when a log is closed.
#[derive(Clone, Debug)]
pub struct LogTerm {
    /// Precision for inline numeric text.
    pub precision: Precision,
    /// Sample rate in Hz, recorded by spike logs.
    pub sample_rate: f64,
    /// `AuthTool` root tag.
    pub tool: String,
    /// `AuthToolVersion` root tag.
    pub tool_version: String,
}

impl LogTerm {
    /// Default `AuthTool` value.
    pub const DEFAULT_TOOL: &'static str = "numerus";

    /// Full precision, a 1 Hz sample rate and this crate as the tool.
    pub fn new() -> Self {
        Self {
            precision: Precision::NotSet,
            sample_rate: 1.0,
            tool: Self::DEFAULT_TOOL.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for LogTerm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = LogConfig::default();
        assert_eq!(c.inline_threshold, 1000);
        assert_eq!(c.buffering, BufferingPolicy::AllowFile);
        assert!(!c.encapsulate);
        assert!(c.filename.is_none());

        let t = LogTerm::default();
        assert_eq!(t.precision, Precision::NotSet);
        assert_eq!(t.tool, "numerus");
    }

    #[test]
    fn builders() {
        let c = LogConfig::new(10)
            .with_filename("out.bin")
            .with_buffering(BufferingPolicy::OnlyMemory)
            .encapsulated();
        assert_eq!(c.expected_samples, 10);
        assert_eq!(c.filename.as_deref(), Some(std::path::Path::new("out.bin")));
        assert_eq!(c.buffering, BufferingPolicy::OnlyMemory);
        assert!(c.encapsulate);
    }
}
