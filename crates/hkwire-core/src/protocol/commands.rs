//! Destination-scoped command table.
//!
//! Command codes are interpreted relative to the device they address, so the
//! table is keyed by destination first. Entries optionally bind a payload
//! decoder; entries without one (and unknown commands) fall back to
//! [`PayloadDecoder::Generic`].

use std::borrow::Cow;

use super::payload::{PayloadDecoder, TimeDirection};
use super::{CommandCode, DeviceId, format_hex};

/// Label plus optional payload interpretation for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub label: &'static str,
    pub decoder: Option<PayloadDecoder>,
}

impl CommandEntry {
    const fn label(label: &'static str) -> Self {
        Self {
            label,
            decoder: None,
        }
    }

    const fn with_decoder(label: &'static str, decoder: PayloadDecoder) -> Self {
        Self {
            label,
            decoder: Some(decoder),
        }
    }
}

/// Outcome of a command lookup; always usable, even for unknown commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub label: Cow<'static, str>,
    pub decoder: PayloadDecoder,
}

type CommandTable = &'static [(CommandCode, CommandEntry)];

const TUNER_COMMANDS: CommandTable = &[
    (0x01, CommandEntry::label("System On")),
    (0x02, CommandEntry::label("System Off")),
    (0x05, CommandEntry::label("Stop all")),
    (0x06, CommandEntry::label("Device not playing")),
    (0x07, CommandEntry::label("Device is  playing")),
    (
        0x0B,
        CommandEntry::with_decoder("Current FF/FR speed", PayloadDecoder::FfSpeed),
    ),
    (
        0x0C,
        CommandEntry::with_decoder(
            "Set time to display",
            PayloadDecoder::Time(TimeDirection::Forward),
        ),
    ),
    (
        0x0D,
        CommandEntry::with_decoder(
            "Set neg. time to display",
            PayloadDecoder::Time(TimeDirection::Reverse),
        ),
    ),
    (0x0F, CommandEntry::label("Tape deck present (?)")),
    (0x10, CommandEntry::label("Tape playing forward")),
    (0x11, CommandEntry::label("Tape playing reverse")),
    (0x14, CommandEntry::label("NOT able to record")),
    (0x15, CommandEntry::label("Able to record")),
];

const TAPE_COMMANDS: CommandTable = &[
    (0x07, CommandEntry::label("Eject ?")),
    (0x08, CommandEntry::label("Increase FF speed")),
    (0x09, CommandEntry::label("Increase FR speed")),
    (0x0A, CommandEntry::label("FF ?")),
    (0x0B, CommandEntry::label("FR ?")),
    (0x0E, CommandEntry::label("Set Dolby: B")),
    (0x0F, CommandEntry::label("Set Dolby: C")),
    (0x10, CommandEntry::label("Set Dolby: None")),
    (0x11, CommandEntry::label("Reverse playing direction")),
    (0x15, CommandEntry::label("Request to record")),
    (0x16, CommandEntry::label("Pause")),
    (0x17, CommandEntry::label("Play")),
    (0x1C, CommandEntry::label("Ok to go?")),
    (0x1E, CommandEntry::label("Record")),
    (0x1F, CommandEntry::label("Zero time counter")),
];

// Amp semantics are guesses from captures.
const AMP_COMMANDS: CommandTable = &[
    (0x06, CommandEntry::label("set off?")),
    (0x07, CommandEntry::label("set mute??")),
    (0x13, CommandEntry::label("set input to Tape?")),
];

static COMMANDS_BY_DESTINATION: &[(DeviceId, CommandTable)] = &[
    (0x0, TUNER_COMMANDS),
    (0x3, TAPE_COMMANDS),
    (0x4, AMP_COMMANDS),
];

fn lookup(destination: DeviceId, command: CommandCode) -> Option<&'static CommandEntry> {
    known_commands(destination)
        .find(|(code, _)| *code == command)
        .map(|(_, entry)| entry)
}

/// Iterate the commands known for a destination, in code order. Unknown
/// destinations yield nothing.
pub fn known_commands(
    destination: DeviceId,
) -> impl Iterator<Item = (CommandCode, &'static CommandEntry)> {
    COMMANDS_BY_DESTINATION
        .iter()
        .find(|(id, _)| *id == destination)
        .map(|(_, table)| *table)
        .unwrap_or(&[])
        .iter()
        .map(|(code, entry)| (*code, entry))
}

/// Resolve a command label and payload decoder for the addressed device.
///
/// # Examples
/// ```
/// use hkwire_core::protocol::{PayloadDecoder, resolve_command};
///
/// let play = resolve_command(0x3, 0x17);
/// assert_eq!(play.label, "Play");
/// assert_eq!(play.decoder, PayloadDecoder::Generic);
///
/// let unknown = resolve_command(0x3, 0x42);
/// assert_eq!(unknown.label, "0x42");
/// ```
pub fn resolve_command(destination: DeviceId, command: CommandCode) -> ResolvedCommand {
    match lookup(destination, command) {
        Some(entry) => ResolvedCommand {
            label: Cow::Borrowed(entry.label),
            decoder: entry.decoder.unwrap_or(PayloadDecoder::Generic),
        },
        None => ResolvedCommand {
            label: Cow::Owned(format_hex(command)),
            decoder: PayloadDecoder::Generic,
        },
    }
}
