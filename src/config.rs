//! Parameters of the balance filter.

use crate::{balance::blur::validate_sigma, error::BalanceError};

/// Default standard deviation of the narrow blur.
pub const DEFAULT_SIGMA: f32 = 10.0;

/// Default mix coefficient (fully processed output).
pub const DEFAULT_MIX: f32 = 1.0;

/// Smallest sigma the filter is tuned for. Smaller positive values still run.
pub const NOMINAL_MIN_SIGMA: f32 = 0.5;

/// Tunable parameters of the balance filter.
///
/// The narrow blur uses `sigma`, the wide blur uses `2 * sigma`. `mix` weights
/// the processed result against the original image: `1.0` keeps only the
/// processed result, `0.0` returns the original unchanged, and values outside
/// `[0, 1]` extrapolate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceParams {
    pub sigma: f32,
    pub mix: f32,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            mix: DEFAULT_MIX,
        }
    }
}

impl BalanceParams {
    #[must_use]
    pub const fn new(sigma: f32, mix: f32) -> Self {
        Self { sigma, mix }
    }

    /// Standard deviation of the wide blur.
    #[inline]
    #[must_use]
    pub fn wide_sigma(&self) -> f32 {
        self.sigma + self.sigma
    }

    /// Returns `true` when `sigma` is below the range the filter is tuned for.
    #[must_use]
    pub fn is_below_nominal_sigma(&self) -> bool {
        self.sigma < NOMINAL_MIN_SIGMA
    }

    /// Checks that both parameters can be used by the filter.
    ///
    /// # Errors
    ///
    /// * `BalanceError::InvalidSigma` - When sigma is not a positive finite number
    /// * `BalanceError::InvalidMix` - When mix is NaN or infinite
    pub fn validate(&self) -> Result<(), BalanceError> {
        validate_sigma(self.sigma)?;
        if !self.mix.is_finite() {
            return Err(BalanceError::InvalidMix { mix: self.mix });
        }
        Ok(())
    }
}
