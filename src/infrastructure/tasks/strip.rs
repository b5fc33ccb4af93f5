use std::io;

use linux_embedded_hal::spidev::SpidevOptions;
use linux_embedded_hal::{SPIError, SpidevBus};
use log::{error, info};
use thiserror_no_std::Error;

use cheerlights_composer::{
    Brightness, ColorPoller, HistoryStore, LayoutError, Lifecycle, RendererConfig, ShutdownToken,
    StripLayout, StripRenderer,
};

use crate::config::{FEED, LED_COUNT, LIGHT, SPI, STORAGE};
use crate::infrastructure::drivers::Ws2812Spi;
use crate::infrastructure::repositories::HistoryFile;
use crate::infrastructure::services::{CheerlightsFeed, FeedError};
use crate::infrastructure::types::{AppHistoryStore, AppLifecycle, AppPoller, AppRenderer};
use crate::mk_static;

#[derive(Debug, Error)]
pub enum StripInitError {
    #[error("invalid strip layout: {0}")]
    Layout(LayoutError),
    #[error("failed to open the SPI bus: {0:?}")]
    Spi(SPIError),
    #[error("failed to configure the SPI bus: {0}")]
    SpiConfigure(io::Error),
    #[error("failed to set up the color feed: {0}")]
    Feed(FeedError),
}

impl From<LayoutError> for StripInitError {
    fn from(err: LayoutError) -> Self {
        StripInitError::Layout(err)
    }
}

impl From<SPIError> for StripInitError {
    fn from(err: SPIError) -> Self {
        StripInitError::Spi(err)
    }
}

impl From<FeedError> for StripInitError {
    fn from(err: FeedError) -> Self {
        StripInitError::Feed(err)
    }
}

pub struct StripParts {
    pub lifecycle: AppLifecycle,
    pub poller: AppPoller,
    pub renderer: AppRenderer,
}

fn open_spi(device: &str, clock_hz: u32) -> Result<SpidevBus, StripInitError> {
    let mut bus = SpidevBus::open(device)?;
    let options = SpidevOptions::new().max_speed_hz(clock_hz).build();
    bus.configure(&options).map_err(StripInitError::SpiConfigure)?;
    info!("strip: opened {device} at {clock_hz} Hz");
    Ok(bus)
}

/// Build the strip pipeline and restore the persisted history.
///
/// Must be called once, it claims the static history store.
pub fn init_strip(shutdown: &'static ShutdownToken) -> Result<StripParts, StripInitError> {
    let layout = StripLayout::new(LED_COUNT, LIGHT.segment_length, LIGHT.gap_length)?;
    let store: &'static AppHistoryStore = mk_static!(AppHistoryStore, HistoryStore::new(layout));

    let mut lifecycle = Lifecycle::new(store, shutdown, HistoryFile::new(STORAGE.history_path));
    lifecycle.restore();

    let bus = open_spi(SPI.device, SPI.clock_hz)?;
    let driver = Ws2812Spi::new(bus, LIGHT.pixel_order);
    let config = RendererConfig {
        brightness: Brightness::new(LIGHT.brightness),
        speed: LIGHT.speed,
        frame_delay: LIGHT.frame_delay,
    };
    let renderer = StripRenderer::new(driver, store, shutdown, config)?;

    let poller = ColorPoller::new(CheerlightsFeed::new(&FEED)?, store, shutdown, FEED.poll_interval);

    Ok(StripParts {
        lifecycle,
        poller,
        renderer,
    })
}

/// Task running the strip until shutdown
///
/// Exits the process once the lifecycle has cleaned up, with status 1 if
/// the strip failed.
#[embassy_executor::task]
pub async fn strip_task(parts: StripParts) {
    let StripParts {
        mut lifecycle,
        mut poller,
        mut renderer,
    } = parts;

    let code = match lifecycle.run(&mut poller, &mut renderer).await {
        Ok(()) => {
            info!("strip: stopped");
            0
        }
        Err(err) => {
            error!("strip: {}", err);
            1
        }
    };
    log::logger().flush();
    std::process::exit(code);
}
