use alloc::string::String;
use enough::StopReason;

/// Errors from BMP encoding and header reading.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("palette index {index} at ({x}, {y}) is out of range for a palette of {palette_len} colors")]
    IndexOutOfRange {
        x: u32,
        y: u32,
        index: usize,
        palette_len: usize,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink full: need {needed} bytes, {available} available")]
    SinkFull { needed: usize, available: usize },

    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}
