//! HK Wire core library: semantic decoding of control-bus frames.
//!
//! Frames arrive already framed as `(source, destination, command, data?)`
//! with timestamps. This crate turns them into device names, command
//! descriptions and command-specific payload text:
//! frame sources -> decode engine (identity/command tables + payload
//! decoders) -> decoded frames -> versioned report.
//!
//! Decoding is pure and side-effect free apart from logging; all file I/O is
//! isolated in `source` and `stats`. The lookup tables are immutable statics,
//! so [`decode`] is safe to call from any thread.
//!
//! Invariants:
//! - Unknown devices and commands never fail; they render as hex (`0x4`).
//! - A payload decoder fault only replaces the data label with
//!   [`INVALID_DATA_LABEL`]; the other labels are always emitted.
//! - Reports keep frames in input order and are stable across runs.
//!
//! # Examples
//! ```
//! use hkwire_core::{Frame, decode};
//!
//! let frame = Frame {
//!     timestamp_start: 0.5,
//!     timestamp_end: 0.52,
//!     source: 0x0,
//!     destination: 0x3,
//!     command: 0x17,
//!     data: None,
//! };
//! let decoded = decode(&frame);
//! assert_eq!(decoded.render(), "Tuner -> Tape: Play");
//! ```

use serde::{Deserialize, Serialize};

mod decode;
pub mod protocol;
mod source;
mod stats;

pub use decode::{DecodeError, INVALID_DATA_LABEL, decode, decode_file, decode_source};
pub use protocol::{CommandCode, DeviceId};
pub use source::{
    ExportError, ExportFileSource, FrameSource, InputFormat, JsonLinesSource, SourceError,
};
pub use stats::{EXPECTED_HEADER, ExportStats, HeaderMismatch, StatsError, summarize_export};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// One bus transaction as delivered by the framer.
///
/// `data: Some(vec![])` (present but empty) is distinct from `data: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Start of the transaction in seconds.
    pub timestamp_start: f64,
    /// End of the transaction in seconds.
    pub timestamp_end: f64,
    pub source: DeviceId,
    pub destination: DeviceId,
    pub command: CommandCode,
    #[serde(default)]
    pub data: Option<Vec<u8>>,
}

/// Display template selector for a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Command,
    CommandWithData,
}

impl FrameKind {
    /// Display template, with `{src}`, `{dst}`, `{cmd}` and `{dat}` fields.
    pub fn template(self) -> &'static str {
        match self {
            FrameKind::Command => "{src} -> {dst}: {cmd}",
            FrameKind::CommandWithData => "{src} -> {dst}: {cmd} {dat}",
        }
    }
}

/// Human-readable interpretation of one frame.
///
/// # Examples
/// ```
/// use hkwire_core::{DecodedFrame, FrameKind};
///
/// let frame = DecodedFrame {
///     kind: FrameKind::CommandWithData,
///     timestamp_start: 1.0,
///     timestamp_end: 1.1,
///     source_label: "Tape".to_string(),
///     destination_label: "Tuner".to_string(),
///     command_label: "Set time to display".to_string(),
///     data_label: Some(" 01:02".to_string()),
/// };
/// assert_eq!(frame.render(), "Tape -> Tuner: Set time to display  01:02");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedFrame {
    pub kind: FrameKind,
    pub timestamp_start: f64,
    pub timestamp_end: f64,
    pub source_label: String,
    pub destination_label: String,
    pub command_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_label: Option<String>,
}

impl DecodedFrame {
    /// Substitute the labels into the kind's template.
    pub fn render(&self) -> String {
        self.kind
            .template()
            .replace("{src}", &self.source_label)
            .replace("{dst}", &self.destination_label)
            .replace("{cmd}", &self.command_label)
            .replace("{dat}", self.data_label.as_deref().unwrap_or(""))
    }
}

/// Versioned decode report with frames in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub summary: DecodeSummary,
    pub frames: Vec<DecodedFrame>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Frame counters and time bounds for one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeSummary {
    pub frames_total: u64,
    pub frames_with_data: u64,
    /// Frames whose payload did not fit the bound decoder.
    pub invalid_payloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<f64>,
}

/// Build an empty report for an input.
///
/// # Examples
/// ```
/// use hkwire_core::make_stub_report;
///
/// let report = make_stub_report("capture.csv", 64);
/// assert_eq!(report.report_version, hkwire_core::REPORT_VERSION);
/// assert!(report.frames.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "hkwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: DecodeSummary::default(),
        frames: vec![],
    }
}
