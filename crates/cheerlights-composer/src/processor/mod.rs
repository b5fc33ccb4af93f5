//! Output processing applied to colors before they reach the hardware
//!
//! Currently only global brightness, applied when a segment is written into
//! the frame.

mod brightness;

pub use brightness::Brightness;
