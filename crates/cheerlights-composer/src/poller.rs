//! Periodic color polling
//!
//! Queries the feed, converts the hex answer and appends it to the history.
//! The next query is scheduled one interval after the previous one finished.

use core::fmt::Debug;

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, TimeoutError, Timer, with_timeout};
use log::{debug, info, warn};
use thiserror_no_std::Error;

use crate::color::{HexColorError, Rgb, hex_to_rgb};
use crate::feed::ColorFeed;
use crate::history::HistoryStore;
use crate::shutdown::ShutdownToken;

#[derive(Debug, Error)]
pub enum PollError<E: Debug> {
    #[error("feed query failed: {0:?}")]
    Feed(E),
    #[error("feed query timed out")]
    Timeout,
    #[error("feed returned an invalid color: {0}")]
    InvalidColor(HexColorError),
}

impl<E: Debug> From<TimeoutError> for PollError<E> {
    fn from(_: TimeoutError) -> Self {
        Self::Timeout
    }
}

impl<E: Debug> From<HexColorError> for PollError<E> {
    fn from(err: HexColorError) -> Self {
        Self::InvalidColor(err)
    }
}

/// Background poller feeding the shared history
pub struct ColorPoller<'a, F: ColorFeed, const N: usize> {
    feed: F,
    store: &'a HistoryStore<N>,
    shutdown: &'a ShutdownToken,
    interval: Duration,
}

impl<'a, F: ColorFeed, const N: usize> ColorPoller<'a, F, N> {
    pub fn new(
        feed: F,
        store: &'a HistoryStore<N>,
        shutdown: &'a ShutdownToken,
        interval: Duration,
    ) -> Self {
        Self {
            feed,
            store,
            shutdown,
            interval,
        }
    }

    /// Query the feed and convert its answer, bounded by the poll interval
    pub async fn fetch(&mut self) -> Result<Rgb, PollError<F::Error>> {
        let hex = with_timeout(self.interval, self.feed.current_hex())
            .await?
            .map_err(PollError::Feed)?;
        Ok(hex_to_rgb(&hex)?)
    }

    /// Query the feed once and append the result.
    ///
    /// Returns whether the color was new.
    pub async fn poll_once(&mut self) -> Result<bool, PollError<F::Error>> {
        let color = self.fetch().await?;
        Ok(self.append(color))
    }

    fn append(&self, color: Rgb) -> bool {
        let appended = self.store.append(color);
        if appended {
            info!(
                "poller: new color ({}, {}, {}), {} colors in history",
                color.r,
                color.g,
                color.b,
                self.store.len()
            );
        } else {
            debug!("poller: color ({}, {}, {}) unchanged", color.r, color.g, color.b);
        }
        appended
    }

    /// Poll until shutdown is requested.
    ///
    /// Failed queries are logged and retried on the next interval. A query
    /// still in flight when shutdown is requested is abandoned.
    pub async fn run(&mut self) {
        info!("poller: starting, interval {}s", self.interval.as_secs());

        let shutdown = self.shutdown;
        while !shutdown.is_requested() {
            let fetched = match select(self.fetch(), shutdown.wait()).await {
                Either::First(fetched) => fetched,
                Either::Second(()) => break,
            };
            if shutdown.is_requested() {
                break;
            }
            match fetched {
                Ok(color) => {
                    self.append(color);
                }
                Err(err) => warn!("poller: {}", err),
            }

            select(Timer::after(self.interval), shutdown.wait()).await;
        }

        info!("poller: stopped");
    }
}
