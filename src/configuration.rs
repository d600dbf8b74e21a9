//! Split configuration.
//!
//! [`SplitOptions`] is a builder that threads naming, output format, the
//! remainder policy, and progress reporting into a
//! [`FilmstripSplitter`](crate::FilmstripSplitter) without global state.
//!
//! # Example
//!
//! ```
//! use filmstrip::{OutputFormat, RemainderPolicy, SplitOptions};
//!
//! let options = SplitOptions::new()
//!     .with_prefix("knob")
//!     .with_format(OutputFormat::Png)
//!     .with_remainder_policy(RemainderPolicy::Reject)
//!     .with_batch_size(16);
//! assert_eq!(options.prefix(), "knob");
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::codec::OutputFormat;
use crate::extractor::RemainderPolicy;
use crate::naming::DEFAULT_PREFIX;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Configuration for a split run.
///
/// All fields have sensible defaults: prefix `"frame"`, PNG output, the
/// warn-and-discard remainder policy, no progress callback, batch size 1.
#[derive(Clone)]
pub struct SplitOptions {
    pub(crate) prefix: String,
    pub(crate) format: OutputFormat,
    pub(crate) remainder_policy: RemainderPolicy,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) batch_size: u64,
}

impl Debug for SplitOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SplitOptions")
            .field("prefix", &self.prefix)
            .field("format", &self.format)
            .field("remainder_policy", &self.remainder_policy)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            format: OutputFormat::default(),
            remainder_policy: RemainderPolicy::default(),
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Set the file name prefix.
    ///
    /// An empty prefix is rejected when the splitter is built.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the output image format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Choose how leftover rows are handled.
    #[must_use]
    pub fn with_remainder_policy(mut self, policy: RemainderPolicy) -> Self {
        self.remainder_policy = policy;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every frame; 16 means every 16th frame.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The file name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The remainder policy.
    pub fn remainder_policy(&self) -> RemainderPolicy {
        self.remainder_policy
    }
}
