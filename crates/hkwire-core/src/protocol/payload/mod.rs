//! Payload decoders for command-specific data bytes.
//!
//! Decoders are bound to command table entries and invoked by the decode
//! engine when a frame carries data. They never mutate their input; payloads
//! shorter than a decoder's minimum yield `PayloadError::TooShort`, which the
//! engine turns into a sentinel label.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::PayloadError;
pub use parser::{
    PayloadDecoder, TimeDirection, decode_ff_speed, decode_time, default_data_decode,
};
