use cheerlights_composer::{ColorPoller, HistoryStore, Lifecycle, StripRenderer};
use linux_embedded_hal::SpidevBus;

use crate::config::{HISTORY_CAPACITY, LED_COUNT};
use crate::infrastructure::drivers::Ws2812Spi;
use crate::infrastructure::repositories::HistoryFile;
use crate::infrastructure::services::CheerlightsFeed;

pub type LightDriver = Ws2812Spi<SpidevBus>;

pub type AppHistoryStore = HistoryStore<HISTORY_CAPACITY>;
pub type AppPoller = ColorPoller<'static, CheerlightsFeed, HISTORY_CAPACITY>;
pub type AppRenderer = StripRenderer<'static, LightDriver, LED_COUNT, HISTORY_CAPACITY>;
pub type AppLifecycle = Lifecycle<'static, HistoryFile, HISTORY_CAPACITY>;
