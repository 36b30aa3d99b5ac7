use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Frame;
use crate::source::{FrameSource, SourceError};

use super::error::ExportError;
use super::layout;
use super::reader::ExportRecordReader;

/// Expected and actual header of an export that did not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMismatch {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Compare a header row to the expected export header by value.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use csv::StringRecord;
/// use hkwire_core::source::export::check_header;
///
/// let header = StringRecord::from(vec!["Time [s]", "Type", "Src", "Dst", "Cmd", "Dat"]);
/// assert!(check_header(Some(&header)).is_none());
/// ```
pub fn check_header(header: Option<&StringRecord>) -> Option<HeaderMismatch> {
    let actual: Vec<String> = header
        .map(|record| record.iter().map(str::to_string).collect())
        .unwrap_or_default();
    if actual.iter().map(String::as_str).eq(layout::EXPECTED_HEADER) {
        return None;
    }
    Some(HeaderMismatch {
        expected: layout::EXPECTED_HEADER.iter().map(|s| s.to_string()).collect(),
        actual,
    })
}

/// One parsed export row before range checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub time: f64,
    pub src: u64,
    pub dst: u64,
    pub cmd: u64,
    pub dat: Option<Vec<u8>>,
}

fn is_command_type(kind: &str) -> bool {
    kind.starts_with(layout::COMMAND_TYPE_PREFIX)
}

/// Parse one export row. `Dat` is only read when the row type says the
/// command carries data and the column is present.
pub fn parse_row(record: &StringRecord) -> Result<ExportRow, ExportError> {
    let reader = ExportRecordReader::new(record);
    let time = reader.read_f64(layout::TIME_COLUMN, "Time [s]")?;
    let kind = reader.read_field(layout::TYPE_COLUMN, "Type")?;
    let src = reader.read_int(layout::SRC_COLUMN, "Src")?;
    let dst = reader.read_int(layout::DST_COLUMN, "Dst")?;
    let cmd = reader.read_int(layout::CMD_COLUMN, "Cmd")?;
    let dat = if kind.contains(layout::WITH_DATA_MARKER) && reader.has_field(layout::DAT_COLUMN) {
        Some(reader.read_data_bytes(layout::DAT_COLUMN, "Dat")?)
    } else {
        None
    };
    Ok(ExportRow {
        time,
        src,
        dst,
        cmd,
        dat,
    })
}

fn row_to_frame(row: ExportRow) -> Result<Frame, ExportError> {
    let narrow = |field: &'static str, value: u64| {
        u8::try_from(value).map_err(|_| ExportError::OutOfRange { field, value })
    };
    Ok(Frame {
        timestamp_start: row.time,
        timestamp_end: row.time,
        source: narrow("Src", row.src)?,
        destination: narrow("Dst", row.dst)?,
        command: narrow("Cmd", row.cmd)?,
        data: row.dat,
    })
}

/// Frame source over a command-level CSV export.
pub struct ExportFileSource<R: Read = File> {
    records: StringRecordsIntoIter<R>,
    header_mismatch: Option<HeaderMismatch>,
    word_level: bool,
}

impl ExportFileSource<File> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> ExportFileSource<R> {
    pub fn from_reader(reader: R) -> Result<Self, SourceError> {
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();
        let header = records.next().transpose()?;
        let header_mismatch = check_header(header.as_ref());
        let word_level = header_mismatch.as_ref().is_some_and(|mismatch| {
            mismatch
                .actual
                .iter()
                .map(String::as_str)
                .eq(layout::WORD_LEVEL_HEADER)
        });
        if word_level {
            warn!("word-level export carries no complete frames; all rows are skipped");
        } else if let Some(mismatch) = &header_mismatch {
            warn!(
                expected = ?mismatch.expected,
                actual = ?mismatch.actual,
                "unexpected export header"
            );
        }
        Ok(Self {
            records,
            header_mismatch,
            word_level,
        })
    }

    /// Header difference detected when the export was opened, if any.
    pub fn header_mismatch(&self) -> Option<&HeaderMismatch> {
        self.header_mismatch.as_ref()
    }
}

impl<R: Read> FrameSource for ExportFileSource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        for record in self.records.by_ref() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            if record.iter().all(str::is_empty) {
                continue;
            }
            let kind = ExportRecordReader::new(&record)
                .read_field(layout::TYPE_COLUMN, "Type")
                .map_err(|source| SourceError::Export { line, source })?;
            // Word-level rows carry fewer columns; skip them before any numeric parsing.
            if self.word_level || !is_command_type(kind) {
                debug!(line, kind, "skipping non-command export row");
                continue;
            }
            let row = parse_row(&record).map_err(|source| SourceError::Export { line, source })?;
            let frame = row_to_frame(row).map_err(|source| SourceError::Export { line, source })?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}
