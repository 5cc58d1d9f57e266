//! # imageops-balance
//!
//! A local-contrast "balance" filter for 8-bit images.
//!
//! The filter blurs the image twice (at `sigma` and `2 * sigma`), recombines
//! the two layers with the original through overlay blending, and mixes the
//! result back into the original:
//!
//! - **Overlay**: per-sample overlay blend mode (`OverlayExt`, `overlay_sample`)
//! - **Mix**: per-sample linear interpolation (`MixExt`, `mix_sample`)
//! - **Balance Filter**: the full four-stage pipeline (`BalanceFilter`,
//!   `BalanceFilterExt`, `balance_images`)
//! - **I/O**: component-preserving decode and PNG encode (`SampleImage`)
//!
//! Every sample is processed independently, alpha included; there is no
//! color-space handling.
//!
//! ## Example Usage
//!
//! ```no_run
//! use imageops_balance::{BalanceFilterExt, Image, OverlayExt, MixExt, balance_images};
//! use image::{Luma, Rgb};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Whole filter with a Gaussian blur
//! let image: Image<Rgb<u8>> = Image::new(100, 100);
//! let balanced = image.balance_filter(10.0, 1.0)?;
//!
//! // Pipeline with blur layers prepared elsewhere
//! let mut image: Image<Luma<u8>> = Image::new(100, 100);
//! let mut blur_a: Image<Luma<u8>> = Image::new(100, 100);
//! let mut blur_b: Image<Luma<u8>> = Image::new(100, 100);
//! balance_images(&mut image, &mut blur_a, &mut blur_b, 0.5)?;
//!
//! // Individual blend operations
//! let base: Image<Luma<u8>> = Image::new(10, 10);
//! let layer: Image<Luma<u8>> = Image::new(10, 10);
//! let blended = layer.overlay_onto(&base)?;
//! let mixed = blended.mix_from(&base, 0.25)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `serde`: Enables serialization of `BalanceParams` (optional)

mod balance;
mod config;
mod error;
mod io;
mod utils;

#[cfg(test)]
mod test_utils;

pub use balance::blur::{BlurOperator, GaussianBlur};
pub use balance::mix::{MixExt, mix_in_place, mix_sample};
pub use balance::overlay::{
    MIDTONE, OverlayExt, cross_overlay_in_place, overlay_in_place, overlay_sample,
};
pub use balance::pipeline::{
    BalanceFilter, BalanceFilterApplicator, BalanceFilterExt, balance_images, balance_samples,
};
pub use config::{BalanceParams, DEFAULT_MIX, DEFAULT_SIGMA, NOMINAL_MIN_SIGMA};
pub use error::{BalanceError, ImageIoError};
pub use io::SampleImage;

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
