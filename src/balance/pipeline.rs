//! The balance filter: local contrast enhancement from two blurred layers.
//!
//! ## Overview
//!
//! The filter works on the original image and two blurred copies of it, one
//! at `sigma` (layer A) and one at `2 * sigma` (layer B). Four stages run in a
//! fixed order, each sample independent of its neighbours:
//!
//! ```text
//! 1. A, B  <- overlay(A, B), overlay(B, A)     cross overlay of the layers
//! 2. A     <- overlay(base = image, A)
//! 3. B     <- overlay(base = A, B)
//! 4. image <- mix * B + (1 - mix) * image
//! ```
//!
//! Only the last stage writes into the image, so `mix = 0.0` returns the
//! original unchanged.
//!
//! ## Usage
//!
//! ```no_run
//! use imageops_balance::{BalanceFilter, BalanceFilterApplicator, BalanceFilterExt, Image};
//! use image::Rgb;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let image: Image<Rgb<u8>> = Image::new(64, 64);
//!
//! // Fluent form
//! let balanced = image.clone().balance_filter(10.0, 1.0)?;
//!
//! // Reusable filter
//! let filter = BalanceFilter::new(4.0, 0.5)?;
//! let softer = filter.balance_filter(&image)?;
//! # Ok(())
//! # }
//! ```

use image::Pixel;
use imageproc::definitions::Image;
use log::debug;

use crate::{
    balance::{
        blur::{BlurOperator, GaussianBlur},
        mix::mix_in_place,
        overlay::{cross_overlay_in_place, overlay_in_place},
    },
    config::BalanceParams,
    error::BalanceError,
    utils::{try_clone_image, validate_matching_dimensions, validate_non_empty_image},
};

/// Runs the four balance stages over raw sample buffers.
///
/// `blur_a` and `blur_b` are used as scratch space and hold the intermediate
/// layers afterwards; the result is written into `image`.
///
/// # Panics
///
/// Panics if the three slices differ in length.
pub fn balance_samples(mix: f32, image: &mut [u8], blur_a: &mut [u8], blur_b: &mut [u8]) {
    cross_overlay_in_place(blur_a, blur_b);
    overlay_in_place(image, blur_a);
    overlay_in_place(blur_a, blur_b);
    mix_in_place(mix, blur_b, image);
}

/// Runs the balance stages over an image and its two blurred layers.
///
/// Use this when the blurred layers come from elsewhere; [`BalanceFilter`]
/// builds them itself.
///
/// # Errors
///
/// * `BalanceError::DimensionMismatch` - When a layer differs in size from the image
///
/// # Examples
///
/// ```
/// use imageops_balance::balance_images;
/// use imageproc::gray_image;
///
/// let mut image = gray_image!(100);
/// let mut blur_a = gray_image!(100);
/// let mut blur_b = gray_image!(100);
///
/// balance_images(&mut image, &mut blur_a, &mut blur_b, 1.0).unwrap();
/// assert_eq!(image.get_pixel(0, 0)[0], 37);
/// ```
pub fn balance_images<P>(
    image: &mut Image<P>,
    blur_a: &mut Image<P>,
    blur_b: &mut Image<P>,
    mix: f32,
) -> Result<(), BalanceError>
where
    P: Pixel<Subpixel = u8>,
{
    validate_matching_dimensions(&*image, &*blur_a)?;
    validate_matching_dimensions(&*image, &*blur_b)?;

    let (width, height) = image.dimensions();
    debug!(
        "balance: {width}x{height}x{} samples, mix={mix}",
        P::CHANNEL_COUNT
    );

    balance_samples(mix, image, blur_a, blur_b);
    Ok(())
}

/// Trait for balance filter implementations.
pub trait BalanceFilterApplicator<P>
where
    P: Pixel,
{
    /// Returns a balanced copy of the image.
    fn balance_filter(&self, image: &Image<P>) -> Result<Image<P>, BalanceError>;

    /// Balances the image in place.
    fn balance_filter_mut(&self, image: &mut Image<P>) -> Result<(), BalanceError>;
}

/// Balance filter with a fixed sigma, mix coefficient and blur operator.
#[derive(Debug, Clone, Copy)]
pub struct BalanceFilter<B = GaussianBlur> {
    params: BalanceParams,
    blur: B,
}

impl BalanceFilter {
    /// Create a new balance filter using the Gaussian blur.
    ///
    /// # Errors
    ///
    /// * `BalanceError::InvalidSigma` - When sigma is not a positive finite number
    /// * `BalanceError::InvalidMix` - When mix is NaN or infinite
    pub fn new(sigma: f32, mix: f32) -> Result<Self, BalanceError> {
        Self::from_params(BalanceParams::new(sigma, mix))
    }

    /// Create a new balance filter from validated parameters.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceFilter::new`].
    pub fn from_params(params: BalanceParams) -> Result<Self, BalanceError> {
        params.validate()?;
        Ok(Self {
            params,
            blur: GaussianBlur,
        })
    }
}

impl<B> BalanceFilter<B>
where
    B: BlurOperator,
{
    /// Replaces the blur operator used to build the two layers.
    #[must_use]
    pub fn with_blur<O>(self, blur: O) -> BalanceFilter<O>
    where
        O: BlurOperator,
    {
        BalanceFilter {
            params: self.params,
            blur,
        }
    }

    #[inline]
    #[must_use]
    pub const fn params(&self) -> &BalanceParams {
        &self.params
    }

    /// Builds the layer blurred with `sigma`.
    fn blurred_layer<P>(&self, image: &Image<P>, sigma: f32) -> Result<Image<P>, BalanceError>
    where
        P: Pixel<Subpixel = u8>,
    {
        let mut layer = try_clone_image(image)?;
        self.blur.blur_in_place(&mut layer, sigma)?;
        Ok(layer)
    }
}

impl<B, P> BalanceFilterApplicator<P> for BalanceFilter<B>
where
    B: BlurOperator,
    P: Pixel<Subpixel = u8>,
{
    fn balance_filter(&self, image: &Image<P>) -> Result<Image<P>, BalanceError> {
        let mut result = try_clone_image(image)?;
        self.balance_filter_mut(&mut result)?;
        Ok(result)
    }

    fn balance_filter_mut(&self, image: &mut Image<P>) -> Result<(), BalanceError> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height)?;

        let mut blur_a = self.blurred_layer(image, self.params.sigma)?;
        let mut blur_b = self.blurred_layer(image, self.params.wide_sigma())?;

        balance_images(image, &mut blur_a, &mut blur_b, self.params.mix)
    }
}

/// Extension trait for `ImageBuffer` to provide fluent balance filter methods.
pub trait BalanceFilterExt<P>
where
    P: Pixel,
{
    /// Apply the balance filter with a Gaussian blur of `sigma` and `2 * sigma`.
    ///
    /// # Errors
    ///
    /// * `BalanceError::InvalidSigma` - When sigma is not a positive finite number
    /// * `BalanceError::InvalidMix` - When mix is NaN or infinite
    /// * `BalanceError::EmptyImage` - When the image has a zero dimension
    /// * `BalanceError::AllocationFailed` - When a blur layer cannot be allocated
    fn balance_filter(self, sigma: f32, mix: f32) -> Result<Self, BalanceError>
    where
        Self: Sized;

    /// Apply the balance filter in-place.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceFilterExt::balance_filter`].
    fn balance_filter_mut(&mut self, sigma: f32, mix: f32) -> Result<&mut Self, BalanceError>;
}

impl<P> BalanceFilterExt<P> for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn balance_filter(mut self, sigma: f32, mix: f32) -> Result<Self, BalanceError> {
        BalanceFilterExt::balance_filter_mut(&mut self, sigma, mix)?;
        Ok(self)
    }

    fn balance_filter_mut(&mut self, sigma: f32, mix: f32) -> Result<&mut Self, BalanceError> {
        let filter = BalanceFilter::new(sigma, mix)?;
        filter.balance_filter_mut(self)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{balance::overlay::overlay_sample, test_utils::*};
    use image::{Luma, LumaA, Rgb, Rgba};
    use imageproc::{gray_image, rgb_image};

    #[test]
    fn balance_samples_with_single_midtone_sample_matches_worked_example() {
        let mut image = [100u8];
        let mut blur_a = [100u8];
        let mut blur_b = [100u8];

        balance_samples(1.0, &mut image, &mut blur_a, &mut blur_b);

        assert_eq!(blur_a, [61]);
        assert_eq!(blur_b, [37]);
        assert_eq!(image, [37]);
    }

    #[test]
    fn balance_samples_with_zero_mix_keeps_original() {
        let mut image = [100u8];
        let mut blur_a = [100u8];
        let mut blur_b = [100u8];

        balance_samples(0.0, &mut image, &mut blur_a, &mut blur_b);

        assert_eq!(image, [100]);
        assert_eq!(blur_b, [37]);
    }

    #[test]
    fn balance_samples_stages_follow_documented_order() {
        let (image_in, a_in, b_in) = (180u8, 90u8, 200u8);
        let mut image = [image_in];
        let mut blur_a = [a_in];
        let mut blur_b = [b_in];

        balance_samples(1.0, &mut image, &mut blur_a, &mut blur_b);

        let a1 = overlay_sample(a_in, b_in);
        let b1 = overlay_sample(b_in, a_in);
        let a2 = overlay_sample(image_in, a1);
        let b2 = overlay_sample(a2, b1);
        assert_eq!(blur_a, [a2]);
        assert_eq!(blur_b, [b2]);
        assert_eq!(image, [b2]);
    }

    #[test]
    fn balance_images_with_gray_image_matches_worked_example() {
        let mut image = gray_image!(100);
        let mut blur_a = gray_image!(100);
        let mut blur_b = gray_image!(100);

        balance_images(&mut image, &mut blur_a, &mut blur_b, 1.0).unwrap();

        assert_eq!(image, gray_image!(37));
    }

    #[test]
    fn balance_images_with_half_mix_blends_towards_original() {
        let mut image = rgb_image!([100, 0, 255]);
        let mut blur_a = rgb_image!([100, 0, 255]);
        let mut blur_b = rgb_image!([100, 0, 255]);

        balance_images(&mut image, &mut blur_a, &mut blur_b, 0.5).unwrap();

        // Black and white are fixed points of every stage.
        // 0.5 * 37 + 0.5 * 100 = 68.5
        assert_eq!(image.get_pixel(0, 0), &Rgb([69, 0, 255]));
    }

    #[test]
    fn balance_images_with_rgba_image_processes_alpha_like_color() {
        let mut image: Image<Rgba<u8>> = Image::from_pixel(2, 2, Rgba([100, 100, 100, 100]));
        let mut blur_a = image.clone();
        let mut blur_b = image.clone();

        balance_images(&mut image, &mut blur_a, &mut blur_b, 1.0).unwrap();

        assert!(image.pixels().all(|pixel| *pixel == Rgba([37, 37, 37, 37])));
    }

    #[test]
    fn balance_images_dimension_mismatch_returns_error() {
        let mut image: Image<Luma<u8>> = Image::new(4, 4);
        let mut blur_a: Image<Luma<u8>> = Image::new(4, 4);
        let mut blur_b: Image<Luma<u8>> = Image::new(4, 5);

        let result = balance_images(&mut image, &mut blur_a, &mut blur_b, 1.0);

        assert!(matches!(
            result,
            Err(BalanceError::DimensionMismatch {
                expected: (4, 4),
                actual: (4, 5),
            })
        ));
    }

    #[test]
    fn balance_images_dimension_mismatch_leaves_buffers_untouched() {
        let mut image: Image<Luma<u8>> = Image::from_pixel(2, 2, Luma([100]));
        let mut blur_a: Image<Luma<u8>> = Image::from_pixel(3, 2, Luma([100]));
        let mut blur_b: Image<Luma<u8>> = Image::from_pixel(2, 2, Luma([100]));

        balance_images(&mut image, &mut blur_a, &mut blur_b, 1.0).unwrap_err();

        assert!(image.pixels().all(|pixel| pixel[0] == 100));
        assert!(blur_b.pixels().all(|pixel| pixel[0] == 100));
    }

    #[test]
    fn balance_filter_with_identity_blur_matches_worked_example() {
        let filter = BalanceFilter::new(2.0, 1.0).unwrap().with_blur(IdentityBlur);
        let image: Image<Luma<u8>> = Image::from_pixel(3, 3, Luma([100]));

        let result = filter.balance_filter(&image).unwrap();

        assert!(result.pixels().all(|pixel| pixel[0] == 37));
        assert!(image.pixels().all(|pixel| pixel[0] == 100));
    }

    #[test]
    fn balance_filter_passes_sigma_and_double_sigma_to_blur() {
        let recorder = RecordingBlur::default();
        let filter = BalanceFilter::new(1.5, 1.0)
            .unwrap()
            .with_blur(recorder.clone());
        let mut image: Image<Luma<u8>> = Image::new(2, 2);

        filter.balance_filter_mut(&mut image).unwrap();

        assert_eq!(recorder.sigmas(), vec![1.5, 3.0]);
    }

    #[test]
    fn balance_filter_with_gaussian_blur_preserves_shape_and_is_deterministic() {
        let image = create_gradient_image(17, 11);
        let filter = BalanceFilter::new(2.0, 0.8).unwrap();

        let first = filter.balance_filter(&image).unwrap();
        let second = filter.balance_filter(&image).unwrap();

        assert_eq!(first.dimensions(), (17, 11));
        assert_eq!(first, second);
    }

    #[test]
    fn balance_filter_with_zero_mix_returns_original() {
        let image = create_gradient_image(9, 9);

        let result = image.clone().balance_filter(3.0, 0.0).unwrap();

        assert_eq!(result, image);
    }

    #[test]
    fn balance_filter_with_black_and_white_keeps_extremes() {
        let image: Image<LumaA<u8>> =
            Image::from_fn(6, 6, |x, _| if x < 3 { LumaA([0, 0]) } else { LumaA([255, 255]) });

        let result = image.clone().balance_filter(1.0, 1.0).unwrap();

        assert_eq!(result, image);
    }

    #[test]
    fn balance_filter_mut_ext_with_method_chaining_updates_image() {
        let mut image: Image<Luma<u8>> = Image::from_pixel(5, 5, Luma([100]));

        let result = image.balance_filter_mut(2.0, 1.0).unwrap();

        assert_eq!(result.dimensions(), (5, 5));
    }

    #[test]
    fn new_with_invalid_parameters_returns_error() {
        assert!(matches!(
            BalanceFilter::new(0.0, 1.0),
            Err(BalanceError::InvalidSigma { .. })
        ));
        assert!(matches!(
            BalanceFilter::new(1.0, f32::INFINITY),
            Err(BalanceError::InvalidMix { .. })
        ));
    }

    #[test]
    fn balance_filter_with_empty_image_returns_error() {
        let image: Image<Luma<u8>> = Image::new(0, 4);
        let filter = BalanceFilter::new(1.0, 1.0).unwrap();

        let result = filter.balance_filter(&image);

        assert!(matches!(
            result,
            Err(BalanceError::EmptyImage {
                width: 0,
                height: 4
            })
        ));
    }
}
