//! Capture analyzer CSV export.
//!
//! The analyzer writes one row per command with the header
//! `Time [s],Type,Src,Dst,Cmd,Dat`. Numbers carry base prefixes (`0x`, `0o`,
//! `0b`, or none for decimal); hex data values are zero-padded to the bit width
//! of the data word, which is how the byte count of a payload survives export.
//!
//! Unexpected headers are diagnostic only: they are logged and reading
//! continues. Malformed numbers are fatal and name the offending line.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{ExportFileSource, HeaderMismatch, check_header, parse_row};
