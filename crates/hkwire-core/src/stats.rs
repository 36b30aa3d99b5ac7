//! Offline statistics over a capture analyzer CSV export.
//!
//! Reports the distinct source, destination and command values seen in an
//! export. This is a diagnostic batch tool: an unexpected header is only a
//! warning for the caller to surface, while a malformed number aborts the run.

use std::collections::BTreeSet;
use std::io::Read;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::source::export::error::ExportError;
use crate::source::export::{check_header, parse_row};

pub use crate::source::export::HeaderMismatch;
pub use crate::source::export::layout::EXPECTED_HEADER;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    Row { line: u64, source: ExportError },
}

/// Distinct values observed in an export, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Data rows read (header excluded).
    pub rows: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_mismatch: Option<HeaderMismatch>,
    pub sources: BTreeSet<u64>,
    pub destinations: BTreeSet<u64>,
    pub commands: BTreeSet<u64>,
}

impl ExportStats {
    /// Plain-text listing, one tab-indented hex value per line.
    ///
    /// # Examples
    /// ```
    /// use hkwire_core::ExportStats;
    ///
    /// let mut stats = ExportStats::default();
    /// stats.sources.insert(0x3);
    /// stats.commands.insert(0x17);
    /// let text = stats.render();
    /// assert!(text.starts_with("Unique sources:\n\t0x3\n"));
    /// assert!(text.ends_with("Unique commands:\n\t0x17\n"));
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (title, values) in [
            ("Unique sources:", &self.sources),
            ("Unique destinations:", &self.destinations),
            ("Unique commands:", &self.commands),
        ] {
            out.push_str(title);
            out.push('\n');
            for value in values {
                out.push_str(&format!("\t{value:#x}\n"));
            }
        }
        out
    }
}

/// Collect distinct values from an export.
///
/// The first row is compared to [`EXPECTED_HEADER`] by value; a mismatch is
/// recorded for the caller to report, then the remaining rows are processed anyway.
pub fn summarize_export<R: Read>(reader: R) -> Result<ExportStats, StatsError> {
    let mut records = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
        .into_records();

    let header = records.next().transpose()?;
    let mut stats = ExportStats {
        header_mismatch: check_header(header.as_ref()),
        ..ExportStats::default()
    };
    if let Some(mismatch) = &stats.header_mismatch {
        debug!(
            expected = ?mismatch.expected,
            actual = ?mismatch.actual,
            "unexpected export header"
        );
    }

    for record in records {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row = parse_row(&record).map_err(|source| StatsError::Row { line, source })?;
        stats.rows += 1;
        stats.sources.insert(row.src);
        stats.destinations.insert(row.dst);
        stats.commands.insert(row.cmd);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_distinct_sorted_values() {
        let input = "Time [s],Type,Src,Dst,Cmd,Dat\n\
                     0.1,command,0x3,0x0,0x11\n\
                     0.2,command with data,0x3,0x0,0x0C,0x0102\n\
                     0.3,command,0x0,0x3,0x17\n";
        let stats = summarize_export(input.as_bytes()).unwrap();
        assert_eq!(stats.rows, 3);
        assert!(stats.header_mismatch.is_none());
        assert_eq!(stats.sources.iter().copied().collect::<Vec<_>>(), vec![0x0, 0x3]);
        assert_eq!(stats.destinations.len(), 2);
        assert_eq!(
            stats.commands.iter().copied().collect::<Vec<_>>(),
            vec![0x0C, 0x11, 0x17]
        );
    }

    #[test]
    fn header_is_compared_by_value() {
        let input = "Time [s],Type,Src,Dst,Cmd,Dat\n";
        let stats = summarize_export(input.as_bytes()).unwrap();
        assert!(stats.header_mismatch.is_none());
        assert_eq!(stats.rows, 0);
    }

    #[test]
    fn unexpected_header_is_reported_and_rows_still_counted() {
        let input = "Time,Type,Source,Destination,Command,Data\n0.1,command,4,3,0x16\n";
        let stats = summarize_export(input.as_bytes()).unwrap();
        let mismatch = stats.header_mismatch.as_ref().expect("mismatch");
        assert_eq!(mismatch.actual[0], "Time");
        assert_eq!(mismatch.expected[0], "Time [s]");
        assert_eq!(stats.sources.iter().copied().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn data_is_ignored_without_with_data_type() {
        let input = "Time [s],Type,Src,Dst,Cmd,Dat\n0.1,command,0x3,0x0,0x11,garbage\n";
        let stats = summarize_export(input.as_bytes()).unwrap();
        assert_eq!(stats.rows, 1);
    }

    #[test]
    fn malformed_number_is_fatal() {
        let input = "Time [s],Type,Src,Dst,Cmd,Dat\n0.1,command,0x3,0x0,0x11\nabc,command,0x3,0x0,0x11\n";
        let err = summarize_export(input.as_bytes()).unwrap_err();
        match err {
            StatsError::Row { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(source, ExportError::InvalidNumber { field: "Time [s]", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn render_lists_each_section() {
        let input = "Time [s],Type,Src,Dst,Cmd,Dat\n0.1,command,0x3,0x0,0x11\n";
        let stats = summarize_export(input.as_bytes()).unwrap();
        assert_eq!(
            stats.render(),
            "Unique sources:\n\t0x3\nUnique destinations:\n\t0x0\nUnique commands:\n\t0x11\n"
        );
    }
}
