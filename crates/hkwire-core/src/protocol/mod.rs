//! HK Wire protocol semantics.
//!
//! The bus carries `(source, destination, command, data?)` frames. This module
//! owns everything needed to turn those numbers into text:
//! - `ids`: device identity table
//! - `commands`: destination-scoped command table with bound payload decoders
//! - `payload`: payload decoders, layered like the other decoders in this crate
//!   (`layout` for offsets and masks, `reader` for safe byte access, `parser`
//!   for the decoders themselves, `error` for explicit failures)
//!
//! Everything here is pure and backed by immutable statics; frame sources and
//! report building live elsewhere.

pub mod commands;
pub mod ids;
pub mod payload;

pub use commands::{CommandEntry, ResolvedCommand, known_commands, resolve_command};
pub use ids::{known_devices, resolve_device_name};
pub use payload::{PayloadDecoder, PayloadError, TimeDirection};

/// Bus-wide device address (4 significant bits on the wire).
pub type DeviceId = u8;

/// Command byte; its meaning is scoped by the destination device.
pub type CommandCode = u8;

/// Render a value the way unknown identifiers and commands are shown:
/// lowercase hexadecimal, `0x` prefix, no padding.
///
/// # Examples
/// ```
/// use hkwire_core::protocol::format_hex;
///
/// assert_eq!(format_hex(4), "0x4");
/// assert_eq!(format_hex(0x1f), "0x1f");
/// ```
pub fn format_hex(value: u8) -> String {
    format!("{:#x}", value)
}
