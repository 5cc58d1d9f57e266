//! Shared helpers for unit tests.

use std::sync::{Arc, Mutex};

use image::{Luma, Pixel};
use imageproc::definitions::Image;

use crate::{balance::blur::BlurOperator, error::BalanceError};

/// Blur operator that leaves the image untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityBlur;

impl BlurOperator for IdentityBlur {
    fn blur_in_place<P>(&self, _image: &mut Image<P>, _sigma: f32) -> Result<(), BalanceError>
    where
        P: Pixel<Subpixel = u8>,
    {
        Ok(())
    }
}

/// Blur operator that records every sigma it is called with.
#[derive(Debug, Clone, Default)]
pub struct RecordingBlur {
    sigmas: Arc<Mutex<Vec<f32>>>,
}

impl RecordingBlur {
    pub fn sigmas(&self) -> Vec<f32> {
        self.sigmas.lock().unwrap().clone()
    }
}

impl BlurOperator for RecordingBlur {
    fn blur_in_place<P>(&self, _image: &mut Image<P>, sigma: f32) -> Result<(), BalanceError>
    where
        P: Pixel<Subpixel = u8>,
    {
        self.sigmas.lock().unwrap().push(sigma);
        Ok(())
    }
}

/// Creates a grayscale image with a diagonal gradient.
pub fn create_gradient_image(width: u32, height: u32) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |x, y| {
        Luma([((x * 255 / width.max(1) + y * 255 / height.max(1)) / 2) as u8])
    })
}
