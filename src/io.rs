//! Decoding and encoding of 8-bit images for the balance filter.
//!
//! - `SampleImage::open`: read a PNG/JPEG/etc. keeping its component count.
//! - `SampleImage::save_png`: write the samples back as a tightly packed PNG.
//! - `SampleImage::balance_filter_mut` / `balance_with_layers`: run the filter
//!   on whichever pixel layout was decoded.

use std::path::Path;

use image::{DynamicImage, ImageFormat, Luma, LumaA, Rgb, Rgba};
use imageproc::definitions::Image;

use crate::{
    balance::{
        blur::BlurOperator,
        pipeline::{BalanceFilter, BalanceFilterApplicator, balance_images},
    },
    error::ImageIoError,
};

/// An 8-bit image with one to four interleaved components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleImage {
    Luma(Image<Luma<u8>>),
    LumaA(Image<LumaA<u8>>),
    Rgb(Image<Rgb<u8>>),
    Rgba(Image<Rgba<u8>>),
}

/// Applies the same expression to the buffer inside any variant.
macro_rules! with_buffer {
    ($image:expr, $buffer:ident => $body:expr) => {
        match $image {
            SampleImage::Luma($buffer) => $body,
            SampleImage::LumaA($buffer) => $body,
            SampleImage::Rgb($buffer) => $body,
            SampleImage::Rgba($buffer) => $body,
        }
    };
}

impl SampleImage {
    /// Converts a decoded image, narrowing samples to 8 bits but keeping the
    /// number of components.
    ///
    /// # Errors
    ///
    /// * `ImageIoError::UnsupportedLayout` - When the image has more than 4 components
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, ImageIoError> {
        match image.color().channel_count() {
            1 => Ok(Self::Luma(image.into_luma8())),
            2 => Ok(Self::LumaA(image.into_luma_alpha8())),
            3 => Ok(Self::Rgb(image.into_rgb8())),
            4 => Ok(Self::Rgba(image.into_rgba8())),
            channels => Err(ImageIoError::UnsupportedLayout { channels }),
        }
    }

    /// Loads an image from disk.
    ///
    /// # Errors
    ///
    /// * `ImageIoError::Decode` - When the file cannot be read or decoded
    /// * `ImageIoError::UnsupportedLayout` - When the image has more than 4 components
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageIoError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ImageIoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_dynamic(decoded)
    }

    /// Saves the image as PNG regardless of the file extension.
    ///
    /// # Errors
    ///
    /// * `ImageIoError::Encode` - When the file cannot be written
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ImageIoError> {
        let path = path.as_ref();
        with_buffer!(self, buffer => buffer.save_with_format(path, ImageFormat::Png)).map_err(
            |source| ImageIoError::Encode {
                path: path.to_path_buf(),
                source,
            },
        )
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        with_buffer!(self, buffer => buffer.dimensions())
    }

    /// Number of interleaved components per pixel.
    #[must_use]
    pub const fn components(&self) -> u8 {
        match self {
            Self::Luma(_) => 1,
            Self::LumaA(_) => 2,
            Self::Rgb(_) => 3,
            Self::Rgba(_) => 4,
        }
    }

    /// Row-major interleaved samples.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        with_buffer!(self, buffer => buffer.as_raw())
    }

    /// Applies `filter` to the image in place.
    ///
    /// # Errors
    ///
    /// * `ImageIoError::Balance` - When the filter rejects the image or cannot
    ///   allocate its blur layers
    pub fn balance_filter_mut<B>(&mut self, filter: &BalanceFilter<B>) -> Result<(), ImageIoError>
    where
        B: BlurOperator,
    {
        with_buffer!(self, buffer => filter.balance_filter_mut(buffer))?;
        Ok(())
    }

    /// Runs the balance stages with externally produced blur layers.
    ///
    /// # Errors
    ///
    /// * `ImageIoError::ChannelMismatch` - When a layer has a different component count
    /// * `ImageIoError::Balance` - When a layer differs in size from the image
    pub fn balance_with_layers(
        &mut self,
        blur_a: &mut Self,
        blur_b: &mut Self,
        mix: f32,
    ) -> Result<(), ImageIoError> {
        match (self, blur_a, blur_b) {
            (Self::Luma(image), Self::Luma(a), Self::Luma(b)) => balance_images(image, a, b, mix)?,
            (Self::LumaA(image), Self::LumaA(a), Self::LumaA(b)) => {
                balance_images(image, a, b, mix)?;
            }
            (Self::Rgb(image), Self::Rgb(a), Self::Rgb(b)) => balance_images(image, a, b, mix)?,
            (Self::Rgba(image), Self::Rgba(a), Self::Rgba(b)) => balance_images(image, a, b, mix)?,
            (image, a, b) => {
                let expected = image.components();
                let actual = if a.components() == expected {
                    b.components()
                } else {
                    a.components()
                };
                return Err(ImageIoError::ChannelMismatch { expected, actual });
            }
        }
        Ok(())
    }
}
