//! Remote color source abstraction
//!
//! The feed is queried by the poller; any failure is reported back as an
//! error and never stops the animation.

use core::fmt::Debug;

/// Hex color string as returned by the feed, e.g. `#ff00ff`
pub type HexColor = heapless::String<16>;

#[allow(async_fn_in_trait)]
pub trait ColorFeed {
    type Error: Debug;

    /// Fetch the current color as a hex string
    async fn current_hex(&mut self) -> Result<HexColor, Self::Error>;
}
