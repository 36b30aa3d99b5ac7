use super::error::PayloadError;
use super::layout;

pub struct PayloadReader<'a> {
    payload: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), PayloadError> {
        if self.payload.len() < needed {
            return Err(PayloadError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, PayloadError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(PayloadError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    /// Read one byte as `(high nibble, low nibble)`.
    pub fn read_nibbles(&self, offset: usize) -> Result<(u8, u8), PayloadError> {
        let byte = self.read_u8(offset)?;
        Ok((
            (byte >> layout::NIBBLE_BITS) & layout::NIBBLE_MASK,
            byte & layout::NIBBLE_MASK,
        ))
    }

    /// Big-endian unsigned value of the whole payload as lowercase hex digits,
    /// without leading zeros. Empty payloads yield `"0"`.
    pub fn read_be_hex_digits(&self) -> String {
        let digits: String = self.payload.iter().map(|b| format!("{:02x}", b)).collect();
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}
