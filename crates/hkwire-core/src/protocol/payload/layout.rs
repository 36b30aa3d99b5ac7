/// Time display payload: two BCD-style bytes, minutes then seconds.
pub const TIME_LEN: usize = 2;
pub const TIME_MINUTES_OFFSET: usize = 0;
pub const TIME_SECONDS_OFFSET: usize = 1;

/// FF/FR speed payload: only the first byte is meaningful.
pub const FF_SPEED_LEN: usize = 1;
pub const FF_SPEED_OFFSET: usize = 0;
pub const FF_DIRECTION_MASK: u8 = 0x80;
pub const FF_MAGNITUDE_MASK: u8 = 0x0F;

pub const NIBBLE_MASK: u8 = 0x0F;
pub const NIBBLE_BITS: u32 = 4;
