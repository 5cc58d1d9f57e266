//! Internal utility functions for imageops-balance.
//!
//! This module contains common functionality used across the balance operations.

use image::{GenericImageView, ImageBuffer, Pixel};
use imageproc::definitions::Image;

use crate::error::BalanceError;

/// Largest value an 8-bit sample can hold, as used by the blend formulas.
pub const SAMPLE_MAX: f32 = 255.0;

/// Converts a blended value back to an 8-bit sample.
///
/// Negative values map to 0, values below 255 are rounded half-up and
/// everything else (including NaN) saturates to 255.
#[inline]
#[must_use]
pub fn round_to_sample(value: f32) -> u8 {
    if value < 0.0 {
        0
    } else if value < SAMPLE_MAX {
        (value + 0.5) as u8
    } else {
        u8::MAX
    }
}

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise an error
pub fn validate_non_empty_image(width: u32, height: u32) -> Result<(), BalanceError> {
    if width == 0 || height == 0 {
        Err(BalanceError::EmptyImage { width, height })
    } else {
        Ok(())
    }
}

/// Validates that two images have matching dimensions.
pub fn validate_matching_dimensions<I1, I2>(expected: &I1, actual: &I2) -> Result<(), BalanceError>
where
    I1: GenericImageView,
    I2: GenericImageView,
{
    let expected = expected.dimensions();
    let actual = actual.dimensions();

    if expected == actual {
        Ok(())
    } else {
        Err(BalanceError::DimensionMismatch { expected, actual })
    }
}

/// Copies an image, reporting allocation failure instead of aborting.
pub fn try_clone_image<P>(image: &Image<P>) -> Result<Image<P>, BalanceError>
where
    P: Pixel<Subpixel = u8>,
{
    let raw = image.as_raw();
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(raw.len())
        .map_err(|_| BalanceError::AllocationFailed { bytes: raw.len() })?;
    samples.extend_from_slice(raw);

    let (width, height) = image.dimensions();
    ImageBuffer::from_raw(width, height, samples).ok_or(BalanceError::BufferCreationFailed)
}
