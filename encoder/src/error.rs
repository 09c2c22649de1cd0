//! Encoder error types.

use thiserror::Error;

/// Violation of the generation callback contract.
///
/// These indicate a broken upstream protocol rather than bad data. They are
/// reported before any encoder state is changed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncoderError {
    #[error("Prototype {0} is already registered")]
    DuplicatePrototype(i32),
    #[error("Prototype {0} is not registered")]
    UnknownPrototype(i32),
    #[error("{stream} index {index} out of range (len {len})")]
    IndexOutOfRange {
        stream: &'static str,
        index: u32,
        len: usize,
    },
    #[error("{stream} has {actual} entries, expected {expected}")]
    StreamLength {
        stream: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{stream} length {len} is not a multiple of {arity}")]
    PartialTuple {
        stream: &'static str,
        len: usize,
        arity: usize,
    },
    #[error("Face {face} has {corners} corners, at least 3 required")]
    DegenerateFace { face: usize, corners: u32 },
    #[error("Face groups cover {requested} faces but only {available} were supplied")]
    FaceRangeOverflow { requested: usize, available: usize },
    #[error("Invalid settings: {0}")]
    Settings(String),
}

pub type EncoderResult<T> = Result<T, EncoderError>;

/// Failure to resolve a texture URI into pixel data.
///
/// Never escapes the material builder; the affected parameter stays unbound.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Failed to read {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to decode {uri}: {message}")]
    Decode { uri: String, message: String },
    #[error("Image {uri} has invalid dimensions {width}x{height}")]
    InvalidDimensions { uri: String, width: u32, height: u32 },
}
