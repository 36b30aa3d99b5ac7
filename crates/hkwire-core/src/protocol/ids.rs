use std::borrow::Cow;

use super::{DeviceId, format_hex};

/// Devices observed on the bus.
static DEVICE_NAMES: &[(DeviceId, &str)] = &[(0x0, "Tuner"), (0x3, "Tape"), (0x4, "Amp (?)")];

/// Resolve a device address to its registered name, or to its hexadecimal
/// form when the address is unknown.
///
/// # Examples
/// ```
/// use hkwire_core::protocol::resolve_device_name;
///
/// assert_eq!(resolve_device_name(0x3), "Tape");
/// assert_eq!(resolve_device_name(0x9), "0x9");
/// ```
pub fn resolve_device_name(id: DeviceId) -> Cow<'static, str> {
    DEVICE_NAMES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| Cow::Borrowed(*name))
        .unwrap_or_else(|| Cow::Owned(format_hex(id)))
}

/// Iterate the known device table in address order.
pub fn known_devices() -> impl Iterator<Item = (DeviceId, &'static str)> {
    DEVICE_NAMES.iter().copied()
}
