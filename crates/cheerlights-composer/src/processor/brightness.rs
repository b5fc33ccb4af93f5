//! Global brightness scaling
//!
//! The strip runs at a fixed fraction of full intensity. Every channel is
//! scaled as `floor(channel * brightness)`.

use crate::color::Rgb;

/// Brightness factor in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brightness(f32);

impl Brightness {
    pub const FULL: Self = Self(1.0);
    pub const OFF: Self = Self(0.0);

    /// Create a brightness factor, clamping to `[0.0, 1.0]`.
    ///
    /// NaN is treated as off.
    pub fn new(factor: f32) -> Self {
        if factor.is_nan() {
            return Self::OFF;
        }
        Self(factor.clamp(0.0, 1.0))
    }

    /// Scale a single color
    pub fn scale(self, color: Rgb) -> Rgb {
        Rgb::new(
            self.scale_channel(color.r),
            self.scale_channel(color.g),
            self.scale_channel(color.b),
        )
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scale_channel(self, value: u8) -> u8 {
        // Truncation is floor for non-negative values
        (f32::from(value) * self.0) as u8
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::FULL
    }
}
