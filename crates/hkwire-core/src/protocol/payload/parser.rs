use serde::{Deserialize, Serialize};

use super::error::PayloadError;
use super::layout;
use super::reader::PayloadReader;

/// Sign of the time shown on the tuner display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDirection {
    Forward,
    Reverse,
}

impl TimeDirection {
    fn sign(self) -> char {
        match self {
            TimeDirection::Forward => ' ',
            TimeDirection::Reverse => '-',
        }
    }
}

/// Payload interpretation bound to a command table entry.
///
/// # Examples
/// ```
/// use hkwire_core::protocol::{PayloadDecoder, TimeDirection};
///
/// let decoder = PayloadDecoder::Time(TimeDirection::Reverse);
/// assert_eq!(decoder.decode(&[0x01, 0x30]).unwrap(), "-01:30");
/// assert_eq!(PayloadDecoder::Generic.decode(&[0x01, 0x02]).unwrap(), "0x102");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadDecoder {
    /// Big-endian integer rendered as hex; used when nothing specific is known.
    Generic,
    Time(TimeDirection),
    FfSpeed,
}

impl PayloadDecoder {
    pub fn decode(self, payload: &[u8]) -> Result<String, PayloadError> {
        match self {
            PayloadDecoder::Generic => Ok(default_data_decode(payload)),
            PayloadDecoder::Time(direction) => decode_time(direction, payload),
            PayloadDecoder::FfSpeed => decode_ff_speed(payload),
        }
    }
}

/// Interpret the payload as an unsigned big-endian integer of any width.
pub fn default_data_decode(payload: &[u8]) -> String {
    format!("0x{}", PayloadReader::new(payload).read_be_hex_digits())
}

/// Decode a `MM:SS` display time. Nibbles are shown as-is, so values above 9
/// come out as hex letters.
pub fn decode_time(direction: TimeDirection, payload: &[u8]) -> Result<String, PayloadError> {
    let reader = PayloadReader::new(payload);
    reader.require_len(layout::TIME_LEN)?;
    let (m_hi, m_lo) = reader.read_nibbles(layout::TIME_MINUTES_OFFSET)?;
    let (s_hi, s_lo) = reader.read_nibbles(layout::TIME_SECONDS_OFFSET)?;
    Ok(format!(
        "{}{:x}{:x}:{:x}{:x}",
        direction.sign(),
        m_hi,
        m_lo,
        s_hi,
        s_lo
    ))
}

/// Decode the fast-forward/rewind speed reported to the tuner.
pub fn decode_ff_speed(payload: &[u8]) -> Result<String, PayloadError> {
    let reader = PayloadReader::new(payload);
    reader.require_len(layout::FF_SPEED_LEN)?;
    let value = reader.read_u8(layout::FF_SPEED_OFFSET)?;
    let magnitude = value & layout::FF_MAGNITUDE_MASK;
    let direction = if value & layout::FF_DIRECTION_MASK == 0 {
        "forward"
    } else {
        "backward"
    };
    Ok(format!("{magnitude} times {direction}"))
}
