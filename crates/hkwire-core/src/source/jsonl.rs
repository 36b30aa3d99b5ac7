use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::Frame;
use crate::source::{FrameSource, SourceError};

/// Frame source over JSON lines, one [`Frame`] object per line. Blank lines
/// are ignored.
pub struct JsonLinesSource<R: BufRead = BufReader<File>> {
    lines: Lines<R>,
    line: u64,
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        for text in self.lines.by_ref() {
            let text = text?;
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&text).map_err(|err| SourceError::Json {
                line: self.line,
                message: err.to_string(),
            })?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_frames_and_skips_blank_lines() {
        let input = concat!(
            r#"{"timestamp_start":0.0,"timestamp_end":0.1,"source":0,"destination":3,"command":23}"#,
            "\n\n",
            r#"{"timestamp_start":0.2,"timestamp_end":0.3,"source":3,"destination":0,"command":11,"data":[131]}"#,
            "\n"
        );
        let mut source = JsonLinesSource::from_reader(input.as_bytes());
        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.command, 0x17);
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.data, Some(vec![0x83]));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let input = "\n{\"timestamp_start\":0.0}\n";
        let mut source = JsonLinesSource::from_reader(input.as_bytes());
        let err = source.next_frame().unwrap_err();
        assert!(matches!(err, SourceError::Json { line: 2, .. }));
    }
}
