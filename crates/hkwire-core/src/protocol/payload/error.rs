use thiserror::Error;

/// Errors returned by payload decoders.
///
/// # Examples
/// ```
/// use hkwire_core::protocol::PayloadError;
///
/// let err = PayloadError::TooShort { needed: 2, actual: 1 };
/// assert!(err.to_string().contains("payload too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
