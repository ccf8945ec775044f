use std::path::PathBuf;
use thiserror::Error;

/// The main error type for imgcurate operations.
#[derive(Debug, Error)]
pub enum CurateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A file could not be decoded as an image.
    ///
    /// This is the only per-file recoverable variant: the validation gate
    /// turns it into rejection code 3 and the run continues.
    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeFailure,
    },

    #[error("Shape error: {message}")]
    Shape { message: String },

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    #[error("Failed to write rejection log {}: {source}", path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write label table {}: {source}", path.display())]
    LabelsWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse label table {}: {source}", path.display())]
    LabelsParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid dataset at {}: {message}", path.display())]
    InvalidDataset { path: PathBuf, message: String },

    #[error("Failed to write image {}: {source}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl CurateError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        CurateError::Shape {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        CurateError::InvalidValue {
            message: message.into(),
        }
    }
}

/// Why a file could not be turned into pixels.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("corrupt image data: {0}")]
    Corrupt(String),

    #[error("unsupported encoding: {0}")]
    Unsupported(String),

    #[error("decoder limits exceeded: {0}")]
    Limits(String),
}
