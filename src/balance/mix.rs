//! Linear mixing of two 8-bit images.

use image::Pixel;
use imageproc::definitions::Image;
use itertools::Itertools;

use crate::{
    error::BalanceError,
    utils::{round_to_sample, validate_matching_dimensions},
};

/// Interpolates between two samples: `coef * first + (1 - coef) * second`.
///
/// `coef` is not restricted to `[0, 1]`; values outside extrapolate and the
/// result is clamped.
///
/// The `coef * first` product is taken in `f32`; the `(1 - coef) * second`
/// term and the sum are taken in `f64` and narrowed to `f32` before rounding.
///
/// # Examples
///
/// ```
/// use imageops_balance::mix_sample;
///
/// assert_eq!(mix_sample(1.0, 37, 100), 37);
/// assert_eq!(mix_sample(0.0, 37, 100), 100);
/// assert_eq!(mix_sample(0.5, 0, 255), 128);
/// ```
#[inline]
#[must_use]
pub fn mix_sample(coef: f32, first: u8, second: u8) -> u8 {
    let weighted_first = f64::from(coef * f32::from(first));
    let value = weighted_first + (1.0 - f64::from(coef)) * f64::from(second);
    round_to_sample(value as f32)
}

/// Mixes `source` into `target`, writing the result into `target`.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn mix_in_place(coef: f32, source: &[u8], target: &mut [u8]) {
    target
        .iter_mut()
        .zip_eq(source)
        .for_each(|(second, &first)| *second = mix_sample(coef, first, *second));
}

/// Trait providing linear mixing for 8-bit images.
pub trait MixExt {
    /// Mixes `source` into this image with weight `coef`.
    ///
    /// Each sample becomes `coef * source + (1 - coef) * self`, so `1.0`
    /// yields `source` and `0.0` leaves the image unchanged.
    ///
    /// # Errors
    ///
    /// * `BalanceError::DimensionMismatch` - When the two images differ in size
    fn mix_from(self, source: &Self, coef: f32) -> Result<Self, BalanceError>
    where
        Self: Sized;

    /// In-place variant of [`MixExt::mix_from`].
    ///
    /// # Errors
    ///
    /// * `BalanceError::DimensionMismatch` - When the two images differ in size
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_balance::{Image, MixExt};
    /// use image::Luma;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let processed: Image<Luma<u8>> = Image::from_pixel(8, 8, Luma([40]));
    /// let mut original: Image<Luma<u8>> = Image::from_pixel(8, 8, Luma([200]));
    ///
    /// original.mix_from_mut(&processed, 0.75)?;
    /// # Ok(())
    /// # }
    /// ```
    fn mix_from_mut(&mut self, source: &Self, coef: f32) -> Result<&mut Self, BalanceError>;
}

impl<P> MixExt for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn mix_from(mut self, source: &Self, coef: f32) -> Result<Self, BalanceError> {
        self.mix_from_mut(source, coef)?;
        Ok(self)
    }

    fn mix_from_mut(&mut self, source: &Self, coef: f32) -> Result<&mut Self, BalanceError> {
        validate_matching_dimensions(source, &*self)?;
        mix_in_place(coef, source, self);
        Ok(self)
    }
}
