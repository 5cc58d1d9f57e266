use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or running the balance filter.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("Image dimensions must match: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Sigma must be a finite number greater than zero, got {sigma}")]
    InvalidSigma { sigma: f32 },

    #[error("Mix coefficient must be a finite number, got {mix}")]
    InvalidMix { mix: f32 },

    #[error("Failed to allocate {bytes} bytes for an image copy")]
    AllocationFailed { bytes: usize },

    #[error("Failed to create image buffer from raw samples")]
    BufferCreationFailed,
}

/// Errors raised by the decode and encode collaborators.
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("Failed to load {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported channel count {channels}; expected 1 to 4 components")]
    UnsupportedLayout { channels: u8 },

    #[error("Failed to save {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Channel counts must match: expected {expected}, got {actual}")]
    ChannelMismatch { expected: u8, actual: u8 },

    #[error(transparent)]
    Balance(#[from] BalanceError),
}
