//! Pixel sink abstraction
//!
//! The renderer and the lifecycle controller only see this trait, so the
//! engine runs the same against SPI hardware or a test recorder.

use core::fmt::Debug;

use crate::color::Rgb;

/// Strip of `N` addressable pixels
pub trait LedDriver<const N: usize> {
    type Error: Debug;

    /// Write a full frame to the strip and latch it
    fn write(&mut self, colors: &[Rgb; N]) -> Result<(), Self::Error>;

    /// Turn every pixel off
    fn off(&mut self) -> Result<(), Self::Error> {
        self.write(&[Rgb::default(); N])
    }
}
