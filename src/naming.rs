//! Output file naming.
//!
//! Frames are written as `{prefix}_{index}.{ext}` with an unpadded decimal
//! index, e.g. `knob_0.png`, `knob_1.png`, ..., `knob_127.png`. Downstream
//! tools load frames by this exact name.

use std::path::{Path, PathBuf};

/// Default file name prefix.
pub const DEFAULT_PREFIX: &str = "frame";

/// File name for frame `index`.
pub fn frame_file_name(prefix: &str, index: u32, extension: &str) -> String {
    format!("{prefix}_{index}.{extension}")
}

/// Full destination path for frame `index` inside `output_dir`.
pub fn frame_path(output_dir: &Path, prefix: &str, index: u32, extension: &str) -> PathBuf {
    output_dir.join(frame_file_name(prefix, index, extension))
}
