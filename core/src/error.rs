use thiserror::Error;

#[derive(Error, Debug)]
pub enum MisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Report fetch failed for '{kind}': {reason}")]
    Fetch { kind: String, reason: String },

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MisResult<T> = Result<T, MisError>;

/// A report payload did not match the envelope its kind declares.
/// Raised only by the typed decode path; the lenient normalizer
/// degrades to empty instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Decode error for '{kind}': expected {expected} envelope, found {found}")]
pub struct DecodeError {
    pub kind: &'static str,
    pub expected: &'static str,
    pub found: String,
}
