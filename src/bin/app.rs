use std::process;

use embassy_executor::Executor;
use log::{error, info};
use static_cell::StaticCell;

use cheerlights_strip::config::{FEED, LED_COUNT, SPI, STORAGE};
use cheerlights_strip::infrastructure::signals::install_shutdown_handlers;
use cheerlights_strip::infrastructure::tasks::{init_strip, strip_task};

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!(
        "app: starting, {} LEDs on {}, polling {} every {}s, history in {}",
        LED_COUNT,
        SPI.device,
        FEED.url,
        FEED.poll_interval.as_secs(),
        STORAGE.history_path
    );

    let shutdown = match install_shutdown_handlers() {
        Ok(shutdown) => shutdown,
        Err(err) => {
            error!("app: failed to install signal handlers: {}", err);
            process::exit(1);
        }
    };

    let parts = match init_strip(shutdown) {
        Ok(parts) => parts,
        Err(err) => {
            error!("app: {}", err);
            process::exit(1);
        }
    };

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        if let Err(err) = spawner.spawn(strip_task(parts)) {
            error!("app: failed to spawn the strip task: {:?}", err);
            process::exit(1);
        }
    });
}
