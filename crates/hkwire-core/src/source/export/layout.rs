/// Header row written by the capture analyzer's command-level CSV export.
pub const EXPECTED_HEADER: [&str; 6] = ["Time [s]", "Type", "Src", "Dst", "Cmd", "Dat"];

/// Header of a word-level export: one row per bus word, never a whole frame.
pub const WORD_LEVEL_HEADER: [&str; 3] = ["Time [s]", "Type", "Dat"];

pub const TIME_COLUMN: usize = 0;
pub const TYPE_COLUMN: usize = 1;
pub const SRC_COLUMN: usize = 2;
pub const DST_COLUMN: usize = 3;
pub const CMD_COLUMN: usize = 4;
pub const DAT_COLUMN: usize = 5;

/// Command-level rows are typed `command` or `command with data`. Word-level
/// rows (`start`, `source`, `command`, ...) carry no complete frame.
pub const COMMAND_TYPE_PREFIX: &str = "command";
pub const WITH_DATA_MARKER: &str = "with data";

pub const HEX_PREFIXES: [&str; 2] = ["0x", "0X"];
pub const OCT_PREFIXES: [&str; 2] = ["0o", "0O"];
pub const BIN_PREFIXES: [&str; 2] = ["0b", "0B"];
