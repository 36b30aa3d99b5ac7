use csv::StringRecord;

use super::error::ExportError;
use super::layout;

pub struct ExportRecordReader<'a> {
    record: &'a StringRecord,
}

impl<'a> ExportRecordReader<'a> {
    pub fn new(record: &'a StringRecord) -> Self {
        Self { record }
    }

    pub fn has_field(&self, index: usize) -> bool {
        index < self.record.len()
    }

    pub fn read_field(&self, index: usize, name: &'static str) -> Result<&'a str, ExportError> {
        self.record
            .get(index)
            .ok_or(ExportError::MissingField { field: name })
    }

    pub fn read_f64(&self, index: usize, name: &'static str) -> Result<f64, ExportError> {
        let text = self.read_field(index, name)?;
        text.parse().map_err(|_| ExportError::InvalidNumber {
            field: name,
            value: text.to_string(),
        })
    }

    pub fn read_int(&self, index: usize, name: &'static str) -> Result<u64, ExportError> {
        let text = self.read_field(index, name)?;
        parse_prefixed_int(text)
            .map(|(value, _)| value)
            .ok_or_else(|| ExportError::InvalidNumber {
                field: name,
                value: text.to_string(),
            })
    }

    pub fn read_data_bytes(&self, index: usize, name: &'static str) -> Result<Vec<u8>, ExportError> {
        let text = self.read_field(index, name)?;
        parse_data_bytes(text).ok_or_else(|| ExportError::InvalidNumber {
            field: name,
            value: text.to_string(),
        })
    }
}

fn strip_any_prefix<'t>(text: &'t str, prefixes: &[&str]) -> Option<&'t str> {
    prefixes.iter().find_map(|prefix| text.strip_prefix(prefix))
}

/// Parse an unsigned integer with an optional base prefix, returning the value
/// and the radix used. Decimal values with leading zeros are rejected unless
/// they are all zeros.
pub fn parse_prefixed_int(text: &str) -> Option<(u64, u32)> {
    let text = text.trim();
    let (digits, radix) = if let Some(digits) = strip_any_prefix(text, &layout::HEX_PREFIXES) {
        (digits, 16)
    } else if let Some(digits) = strip_any_prefix(text, &layout::OCT_PREFIXES) {
        (digits, 8)
    } else if let Some(digits) = strip_any_prefix(text, &layout::BIN_PREFIXES) {
        (digits, 2)
    } else {
        (text, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    if radix == 10 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
        return None;
    }
    u64::from_str_radix(digits, radix)
        .ok()
        .map(|value| (value, radix))
}

/// Parse an exported data word into big-endian bytes.
///
/// Hex text keeps its written width (one byte per two digits), so `0x0059`
/// yields two bytes. Other bases use the minimal width of at least one byte.
pub fn parse_data_bytes(text: &str) -> Option<Vec<u8>> {
    let (value, radix) = parse_prefixed_int(text)?;
    let minimal = ((u64::BITS - value.leading_zeros()).div_ceil(8)).max(1) as usize;
    let width = if radix == 16 {
        let digits = text.trim().len() - 2;
        digits.div_ceil(2).max(minimal)
    } else {
        minimal
    };
    let be = value.to_be_bytes();
    let mut bytes = vec![0u8; width.saturating_sub(be.len())];
    bytes.extend_from_slice(&be[be.len() - width.min(be.len())..]);
    Some(bytes)
}
