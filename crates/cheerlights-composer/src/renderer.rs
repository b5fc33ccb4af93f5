//! Scroll animation
//!
//! Each tick lays the history out as a train of segments, spaced
//! `strip_length / (n + 1)` pixels apart and shifted by the scroll position,
//! writes the frame to the driver and advances the position.

use embassy_time::{Duration, Timer};
use log::info;

use crate::color::Rgb;
use crate::driver::LedDriver;
use crate::history::HistoryStore;
use crate::layout::LayoutError;
use crate::processor::Brightness;
use crate::shutdown::ShutdownToken;

/// Rotating offset applied to every segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    offset: usize,
    strip_length: usize,
}

impl ScrollPosition {
    pub const fn new(strip_length: usize) -> Self {
        Self {
            offset: 0,
            strip_length,
        }
    }

    pub const fn get(&self) -> usize {
        self.offset
    }

    /// Move forward by `speed` pixels, wrapping around the strip
    pub fn advance(&mut self, speed: usize) {
        if self.strip_length == 0 {
            return;
        }
        self.offset = (self.offset + speed % self.strip_length) % self.strip_length;
    }
}

/// Render one frame of the segment train.
///
/// Every pixel is rewritten. An empty history renders an all-off frame.
pub fn render_frame<const LEDS: usize>(
    frame: &mut [Rgb; LEDS],
    colors: &[Rgb],
    position: usize,
    segment_length: usize,
    brightness: Brightness,
) {
    frame.fill(Rgb::default());

    if colors.is_empty() || LEDS == 0 {
        return;
    }

    let step = LEDS / (colors.len() + 1);
    for (i, color) in colors.iter().enumerate() {
        let start = (position + i * step) % LEDS;
        let color = brightness.scale(*color);
        for pixel in 0..segment_length {
            frame[(start + pixel) % LEDS] = color;
        }
    }
}

/// Renderer timing and output settings
#[derive(Debug, Clone, Copy)]
pub struct RendererConfig {
    pub brightness: Brightness,
    /// Pixels advanced per tick
    pub speed: usize,
    pub frame_delay: Duration,
}

pub struct StripRenderer<'a, D: LedDriver<LEDS>, const LEDS: usize, const N: usize> {
    driver: D,
    store: &'a HistoryStore<N>,
    shutdown: &'a ShutdownToken,
    config: RendererConfig,
    segment_length: usize,
    position: ScrollPosition,
    frame: [Rgb; LEDS],
}

impl<'a, D: LedDriver<LEDS>, const LEDS: usize, const N: usize> StripRenderer<'a, D, LEDS, N> {
    /// Create a renderer drawing `store` onto a strip of `LEDS` pixels.
    ///
    /// Fails when the history layout was made for a different strip length.
    pub fn new(
        driver: D,
        store: &'a HistoryStore<N>,
        shutdown: &'a ShutdownToken,
        config: RendererConfig,
    ) -> Result<Self, LayoutError> {
        let layout = store.layout();
        if layout.strip_length() != LEDS {
            return Err(LayoutError::LengthMismatch {
                layout: layout.strip_length(),
                frame: LEDS,
            });
        }

        Ok(Self {
            driver,
            store,
            shutdown,
            config,
            segment_length: layout.segment_length(),
            position: ScrollPosition::new(LEDS),
            frame: [Rgb::default(); LEDS],
        })
    }

    pub fn position(&self) -> usize {
        self.position.get()
    }

    /// Last rendered frame
    pub fn frame(&self) -> &[Rgb; LEDS] {
        &self.frame
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Render the current history, write it out and advance the scroll
    pub fn tick(&mut self) -> Result<(), D::Error> {
        let snapshot = self.store.snapshot();
        render_frame(
            &mut self.frame,
            &snapshot,
            self.position.get(),
            self.segment_length,
            self.config.brightness,
        );

        self.driver.write(&self.frame)?;
        self.position.advance(self.config.speed);
        Ok(())
    }

    /// Tick every frame delay until shutdown is requested.
    ///
    /// A driver error ends the loop and is returned to the caller.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        info!(
            "renderer: starting, {} pixels, frame delay {}ms",
            LEDS,
            self.config.frame_delay.as_millis()
        );

        while !self.shutdown.is_requested() {
            self.tick()?;
            Timer::after(self.config.frame_delay).await;
        }

        info!("renderer: stopped");
        Ok(())
    }
}
