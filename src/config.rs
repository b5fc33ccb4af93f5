use embassy_time::Duration;

use crate::infrastructure::drivers::PixelOrder;

/// Number of pixels on the strip
pub const LED_COUNT: usize = 165;

/// Stored history entries; must cover `LED_COUNT / (segment + gap)`
pub const HISTORY_CAPACITY: usize = 64;

pub struct LightConfig {
    pub pixel_order: PixelOrder,
    pub brightness: f32,
    pub segment_length: usize,
    pub gap_length: usize,
    /// Pixels advanced per frame
    pub speed: usize,
    pub frame_delay: Duration,
}

pub struct FeedConfig {
    pub url: &'static str,
    pub poll_interval: Duration,
    pub connect_timeout: core::time::Duration,
    /// Whole-request bound, connect included
    pub request_timeout: core::time::Duration,
}

pub struct StorageConfig {
    pub history_path: &'static str,
}

pub struct SpiConfig {
    pub device: &'static str,
    pub clock_hz: u32,
}

pub const LIGHT: LightConfig = LightConfig {
    pixel_order: PixelOrder::Grb,
    brightness: 0.05,
    segment_length: 4,
    gap_length: 1,
    speed: 1,
    frame_delay: Duration::from_millis(10),
};

pub const FEED: FeedConfig = FeedConfig {
    url: "https://api.thingspeak.com/channels/1417/field/2/last.json",
    poll_interval: Duration::from_secs(30),
    connect_timeout: core::time::Duration::from_secs(5),
    request_timeout: core::time::Duration::from_secs(10),
};

pub const STORAGE: StorageConfig = StorageConfig {
    history_path: "colors.txt",
};

pub const SPI: SpiConfig = SpiConfig {
    device: "/dev/spidev0.0",
    clock_hz: 6_400_000,
};
