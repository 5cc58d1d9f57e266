//! Overlay blend mode for 8-bit samples.
//!
//! The overlay blend darkens or lightens an overlay value depending on which
//! side of the midtone its base value lies:
//!
//! ```text
//! base <= 127.5:  r = 2 * base * overlay / 255
//! base >  127.5:  r = 255 - 2 * (255 - base) * (255 - overlay) / 255
//! ```
//!
//! The result is converted back to a sample with [`round_to_sample`]
//! (clamp to `[0, 255]`, round half-up).

use image::Pixel;
use imageproc::definitions::Image;
use itertools::Itertools;

use crate::{
    error::BalanceError,
    utils::{SAMPLE_MAX, round_to_sample, validate_matching_dimensions},
};

/// Base values strictly above this threshold take the screen half of the blend.
pub const MIDTONE: f32 = 127.5;

/// Blends one overlay sample onto one base sample.
///
/// # Examples
///
/// ```
/// use imageops_balance::overlay_sample;
///
/// assert_eq!(overlay_sample(100, 100), 78);
/// assert_eq!(overlay_sample(0, 200), 0);
/// assert_eq!(overlay_sample(255, 10), 255);
/// ```
#[inline]
#[must_use]
pub fn overlay_sample(base: u8, overlay: u8) -> u8 {
    round_to_sample(overlay_value(f32::from(base), f32::from(overlay)))
}

#[inline]
fn overlay_value(base: f32, overlay: f32) -> f32 {
    if base > MIDTONE {
        let product = (SAMPLE_MAX - base) * (SAMPLE_MAX - overlay);
        SAMPLE_MAX - (product + product) / SAMPLE_MAX
    } else {
        let product = base * overlay;
        (product + product) / SAMPLE_MAX
    }
}

/// Overlays `target` onto a fixed `base`, writing the blend into `target`.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn overlay_in_place(base: &[u8], target: &mut [u8]) {
    target
        .iter_mut()
        .zip_eq(base)
        .for_each(|(overlay, &base)| *overlay = overlay_sample(base, *overlay));
}

/// Overlays two buffers onto each other.
///
/// Every sample pair is read before either side is written, so `first`
/// receives `overlay(first, second)` and `second` receives
/// `overlay(second, first)`, both from the original values.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn cross_overlay_in_place(first: &mut [u8], second: &mut [u8]) {
    first
        .iter_mut()
        .zip_eq(second.iter_mut())
        .for_each(|(lhs, rhs)| {
            let (a, b) = (*lhs, *rhs);
            *lhs = overlay_sample(a, b);
            *rhs = overlay_sample(b, a);
        });
}

/// Trait providing overlay blending for 8-bit images.
///
/// Operations are channel independent: every subpixel, alpha included, is
/// blended with the subpixel at the same position in the other image.
pub trait OverlayExt {
    /// Overlays this image onto `base`.
    ///
    /// This consumes the image and returns it with the blended samples.
    ///
    /// # Errors
    ///
    /// * `BalanceError::DimensionMismatch` - When the two images differ in size
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_balance::{Image, OverlayExt};
    /// use image::Rgb;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let base: Image<Rgb<u8>> = Image::from_pixel(10, 10, Rgb([200, 100, 50]));
    /// let layer: Image<Rgb<u8>> = Image::from_pixel(10, 10, Rgb([128, 128, 128]));
    ///
    /// let blended = layer.overlay_onto(&base)?;
    /// # Ok(())
    /// # }
    /// ```
    fn overlay_onto(self, base: &Self) -> Result<Self, BalanceError>
    where
        Self: Sized;

    /// Overlays this image onto `base` in-place.
    ///
    /// # Errors
    ///
    /// * `BalanceError::DimensionMismatch` - When the two images differ in size
    fn overlay_onto_mut(&mut self, base: &Self) -> Result<&mut Self, BalanceError>;

    /// Overlays this image and `other` onto each other in-place.
    ///
    /// Both results are computed from the values held before the call.
    ///
    /// # Errors
    ///
    /// * `BalanceError::DimensionMismatch` - When the two images differ in size
    fn cross_overlay_mut(&mut self, other: &mut Self) -> Result<&mut Self, BalanceError>;
}

impl<P> OverlayExt for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn overlay_onto(mut self, base: &Self) -> Result<Self, BalanceError> {
        self.overlay_onto_mut(base)?;
        Ok(self)
    }

    fn overlay_onto_mut(&mut self, base: &Self) -> Result<&mut Self, BalanceError> {
        validate_matching_dimensions(base, &*self)?;
        overlay_in_place(base, self);
        Ok(self)
    }

    fn cross_overlay_mut(&mut self, other: &mut Self) -> Result<&mut Self, BalanceError> {
        validate_matching_dimensions(&*self, &*other)?;
        cross_overlay_in_place(self, other);
        Ok(self)
    }
}
