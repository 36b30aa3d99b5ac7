//! Frame sources.
//!
//! Sources own all file I/O and hand already-framed bus transactions to the
//! decode engine one at a time.

pub mod export;
mod jsonl;

pub use export::ExportFileSource;
pub use export::error::ExportError;
pub use jsonl::JsonLinesSource;

use std::path::Path;

use thiserror::Error;

use crate::Frame;

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("export line {line}: {source}")]
    Export {
        line: u64,
        source: export::error::ExportError,
    },
    #[error("JSON error on line {line}: {message}")]
    Json { line: u64, message: String },
}

/// Input formats understood by [`crate::decode_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Capture analyzer CSV export (`.csv`).
    Export,
    /// One JSON frame per line (`.jsonl`, `.ndjson`).
    JsonLines,
}

impl InputFormat {
    /// Pick the format from the file extension (case-insensitive).
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use hkwire_core::InputFormat;
    ///
    /// assert_eq!(InputFormat::from_path(Path::new("a.CSV")), Some(InputFormat::Export));
    /// assert_eq!(InputFormat::from_path(Path::new("a.pcap")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(InputFormat::Export),
            "jsonl" | "ndjson" => Some(InputFormat::JsonLines),
            _ => None,
        }
    }
}
