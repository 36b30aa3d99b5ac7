use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::{resolve_command, resolve_device_name};
use crate::source::{ExportFileSource, FrameSource, InputFormat, JsonLinesSource, SourceError};
use crate::{DecodeReport, DecodeSummary, DecodedFrame, Frame, FrameKind, make_stub_report};

/// Data label emitted when a payload does not fit its bound decoder.
pub const INVALID_DATA_LABEL: &str = "<invalid data>";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// Decode one frame into labels.
///
/// Commands are looked up by destination. Present data (even empty) goes
/// through the bound payload decoder; a decoder fault yields
/// [`INVALID_DATA_LABEL`] instead of failing the frame.
pub fn decode(frame: &Frame) -> DecodedFrame {
    let command = resolve_command(frame.destination, frame.command);
    let data_label = frame.data.as_deref().map(|data| {
        command.decoder.decode(data).unwrap_or_else(|err| {
            warn!(
                destination = frame.destination,
                command = frame.command,
                decoder = ?command.decoder,
                error = %err,
                "payload decode failed"
            );
            INVALID_DATA_LABEL.to_string()
        })
    });
    DecodedFrame {
        kind: if data_label.is_some() {
            FrameKind::CommandWithData
        } else {
            FrameKind::Command
        },
        timestamp_start: frame.timestamp_start,
        timestamp_end: frame.timestamp_end,
        source_label: resolve_device_name(frame.source).into_owned(),
        destination_label: resolve_device_name(frame.destination).into_owned(),
        command_label: command.label.into_owned(),
        data_label,
    }
}

/// Decode a capture file, choosing the source from the file extension.
pub fn decode_file(path: &Path) -> Result<DecodeReport, DecodeError> {
    match InputFormat::from_path(path) {
        Some(InputFormat::Export) => decode_source(path, ExportFileSource::open(path)?),
        Some(InputFormat::JsonLines) => decode_source(path, JsonLinesSource::open(path)?),
        None => Err(DecodeError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Drain a frame source into a report, keeping input order.
pub fn decode_source<S: FrameSource>(
    path: &Path,
    mut source: S,
) -> Result<DecodeReport, DecodeError> {
    let mut summary = DecodeSummary::default();
    let mut frames = Vec::new();

    while let Some(frame) = source.next_frame()? {
        let decoded = decode(&frame);
        summary.frames_total += 1;
        if frame.data.is_some() {
            summary.frames_with_data += 1;
        }
        if decoded.data_label.as_deref() == Some(INVALID_DATA_LABEL) {
            summary.invalid_payloads += 1;
        }
        update_time_bounds(&mut summary, &frame);
        frames.push(decoded);
    }
    debug!(
        frames = summary.frames_total,
        invalid = summary.invalid_payloads,
        "decoded input"
    );

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.summary = summary;
    report.frames = frames;
    Ok(report)
}

fn update_time_bounds(summary: &mut DecodeSummary, frame: &Frame) {
    summary.time_start = Some(match summary.time_start {
        Some(start) => start.min(frame.timestamp_start),
        None => frame.timestamp_start,
    });
    summary.time_end = Some(match summary.time_end {
        Some(end) => end.max(frame.timestamp_end),
        None => frame.timestamp_end,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(source: u8, destination: u8, command: u8, data: Option<Vec<u8>>) -> Frame {
        Frame {
            timestamp_start: 1.0,
            timestamp_end: 1.02,
            source,
            destination,
            command,
            data,
        }
    }

    #[test]
    fn tuner_to_tape_play() {
        let decoded = decode(&frame(0x0, 0x3, 0x17, None));
        assert_eq!(decoded.source_label, "Tuner");
        assert_eq!(decoded.destination_label, "Tape");
        assert_eq!(decoded.command_label, "Play");
        assert_eq!(decoded.data_label, None);
        assert_eq!(decoded.kind, FrameKind::Command);
    }

    #[test]
    fn ff_speed_reported_to_tuner() {
        let decoded = decode(&frame(0x3, 0x0, 0x0B, Some(vec![0x03])));
        assert_eq!(decoded.command_label, "Current FF/FR speed");
        assert_eq!(decoded.data_label.as_deref(), Some("3 times forward"));
        assert_eq!(decoded.kind, FrameKind::CommandWithData);
    }

    #[test]
    fn negative_time_to_display() {
        let decoded = decode(&frame(0x3, 0x0, 0x0D, Some(vec![0x00, 0x59])));
        assert_eq!(decoded.data_label.as_deref(), Some("-00:59"));
    }

    #[test]
    fn unknown_ids_and_command_fall_back_to_hex() {
        let decoded = decode(&frame(0x9, 0xA, 0x42, Some(vec![0x01, 0x02])));
        assert_eq!(decoded.source_label, "0x9");
        assert_eq!(decoded.destination_label, "0xa");
        assert_eq!(decoded.command_label, "0x42");
        assert_eq!(decoded.data_label.as_deref(), Some("0x102"));
    }

    #[test]
    fn empty_but_present_data_is_decoded() {
        let decoded = decode(&frame(0x0, 0x3, 0x17, Some(vec![])));
        assert_eq!(decoded.data_label.as_deref(), Some("0x0"));
        assert_eq!(decoded.kind, FrameKind::CommandWithData);
    }

    #[test]
    fn short_payload_keeps_other_labels() {
        let decoded = decode(&frame(0x3, 0x0, 0x0C, Some(vec![0x12])));
        assert_eq!(decoded.source_label, "Tape");
        assert_eq!(decoded.destination_label, "Tuner");
        assert_eq!(decoded.command_label, "Set time to display");
        assert_eq!(decoded.data_label.as_deref(), Some(INVALID_DATA_LABEL));
    }

    #[test]
    fn decoding_is_idempotent() {
        let input = frame(0x3, 0x0, 0x0C, Some(vec![0x12, 0x34]));
        assert_eq!(decode(&input), decode(&input));
    }

    struct VecSource(std::vec::IntoIter<Frame>);

    impl FrameSource for VecSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
            Ok(self.0.next())
        }
    }

    #[test]
    fn decode_source_counts_and_bounds() {
        let mut late = frame(0x3, 0x0, 0x0B, Some(vec![]));
        late.timestamp_start = 4.0;
        late.timestamp_end = 4.5;
        let frames = vec![frame(0x0, 0x3, 0x17, None), late];
        let path = std::env::current_dir().unwrap();
        let report = decode_source(&path, VecSource(frames.into_iter())).unwrap();
        assert_eq!(report.summary.frames_total, 2);
        assert_eq!(report.summary.frames_with_data, 1);
        assert_eq!(report.summary.invalid_payloads, 1);
        assert_eq!(report.summary.time_start, Some(1.0));
        assert_eq!(report.summary.time_end, Some(4.5));
        assert_eq!(report.frames[0].command_label, "Play");
    }

    #[test]
    fn decode_file_rejects_unknown_extension() {
        let err = decode_file(Path::new("capture.pcap")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }
}
