use thiserror::Error;

/// Errors returned while interpreting one export row.
///
/// # Examples
/// ```
/// use hkwire_core::ExportError;
///
/// let err = ExportError::MissingField { field: "Cmd" };
/// assert!(err.to_string().contains("missing field"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("missing field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid number in {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} out of range: {value:#x}")]
    OutOfRange { field: &'static str, value: u64 },
}
