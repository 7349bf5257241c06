use std::{io, path::PathBuf};

use thiserror::Error;

/// Why a color token could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorFormatError {
    #[error("color is empty")]
    Empty,
    #[error("color is missing its leading `#`")]
    MissingMarker,
    #[error("invalid hex digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
    #[error("expected 3 or 6 hex digits, found {0}")]
    InvalidLength(usize),
}

/// Why a block token's rectangle could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionFault {
    #[error("expected 5 `-` separated fields, found {0}")]
    FieldCount(usize),
    #[error("`{0}` is not a non-negative integer")]
    NotAnInteger(String),
    #[error("rectangle is empty or exceeds the {width}x{height} image")]
    OutOfBounds { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("cannot open image {}", path.display())]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode image")]
    ImageDecode(#[from] image::ImageError),
    #[error("pixel color information is incorrect in `{token}`")]
    PixelColor {
        token: String,
        #[source]
        source: ColorFormatError,
    },
    #[error("pixel position information is incorrect in `{token}`: {reason}")]
    PixelPosition { token: String, reason: PositionFault },
    #[error("block size must be at least 1x1, got {block_width}x{block_height}")]
    InvalidGrid { block_width: u32, block_height: u32 },
}

pub type Result<T> = std::result::Result<T, DigestError>;
