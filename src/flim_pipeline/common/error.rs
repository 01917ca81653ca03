use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode SDT container: {0}")]
    DecodeError(String),

    #[error("Failed to encode B64 file: {0}")]
    EncodeError(String),

    #[error("Record {record} of {} has shape {actual:?}, expected {expected:?}", source_path.display())]
    ShapeMismatch {
        source_path: PathBuf,
        record: usize,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
