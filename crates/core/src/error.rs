//! Error types for AquaSite

use thiserror::Error;

/// Main error type for AquaSite operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Rasters do not share grid geometry: {0}")]
    GridMismatch(String),

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Missing CRS on {0} raster")]
    MissingCrs(&'static str),

    #[error("Raster extents do not overlap")]
    NoOverlap,

    #[error("Raster stack is empty")]
    EmptyStack,

    #[error("Missing attribute field: {0}")]
    MissingAttribute(String),

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Shapefile error: {0}")]
    Shapefile(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

impl From<shapefile::Error> for Error {
    fn from(e: shapefile::Error) -> Self {
        Error::Shapefile(e.to_string())
    }
}

/// Result type alias for AquaSite operations
pub type Result<T> = std::result::Result<T, Error>;
