mod http;

use std::io;
use std::sync::Arc;
use std::thread;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use thiserror_no_std::Error;

use cheerlights_composer::{ColorFeed, HexColor};

use crate::config::FeedConfig;

type ResponseSignal = Signal<CriticalSectionRawMutex, Result<HexColor, FeedError>>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(reqwest::Error),
    #[error("failed to start the request thread: {0}")]
    Spawn(io::Error),
    #[error("invalid JSON body: {0:?}")]
    Json(serde_json_core::de::Error),
    #[error("response carries no color")]
    MissingColor,
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Http(err)
    }
}

impl From<io::Error> for FeedError {
    fn from(err: io::Error) -> Self {
        FeedError::Spawn(err)
    }
}

/// CheerLights color feed over the ThingSpeak HTTP API
///
/// Each query runs the blocking request on its own worker thread and awaits
/// the answer through a [`Signal`], so the executor keeps rendering while the
/// request is in flight. A query abandoned by the poller's timeout leaves its
/// thread to finish against a signal nobody waits on.
pub struct CheerlightsFeed {
    url: &'static str,
    client: reqwest::blocking::Client,
}

impl CheerlightsFeed {
    pub fn new(config: &'static FeedConfig) -> Result<Self, FeedError> {
        Ok(Self {
            url: config.url,
            client: http::build_client(config)?,
        })
    }
}

impl ColorFeed for CheerlightsFeed {
    type Error = FeedError;

    async fn current_hex(&mut self) -> Result<HexColor, FeedError> {
        let response: Arc<ResponseSignal> = Arc::new(Signal::new());
        let sender = response.clone();
        let client = self.client.clone();
        let url = self.url;

        thread::Builder::new()
            .name("cheerlights-http".into())
            .spawn(move || sender.signal(http::fetch_hex(&client, url)))?;

        let result = response.wait().await;
        if let Ok(hex) = &result {
            log::debug!("cheerlights: feed answered {hex}");
        }
        result
    }
}
