//! Blocking request to the ThingSpeak API

use reqwest::blocking::Client;
use serde::Deserialize;

use cheerlights_composer::HexColor;

use super::FeedError;
use crate::config::FeedConfig;

/// Body of `last.json`, e.g.
/// `{"created_at":"2025-01-05T10:11:12Z","entry_id":123,"field2":"#ff00ff"}`
#[derive(Deserialize)]
#[allow(dead_code)]
struct LastEntry<'a> {
    #[serde(borrow)]
    created_at: Option<&'a str>,
    entry_id: Option<u64>,
    #[serde(borrow)]
    field2: Option<&'a str>,
}

pub(super) fn build_client(config: &FeedConfig) -> Result<Client, FeedError> {
    let client = Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(concat!("cheerlights-strip/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(super) fn fetch_hex(client: &Client, url: &str) -> Result<HexColor, FeedError> {
    let body = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()?
        .error_for_status()?
        .bytes()?;
    parse_field_hex(&body)
}

fn parse_field_hex(body: &[u8]) -> Result<HexColor, FeedError> {
    let (entry, _) = serde_json_core::from_slice::<LastEntry<'_>>(body.trim_ascii())
        .map_err(FeedError::Json)?;
    let hex = entry.field2.ok_or(FeedError::MissingColor)?;
    HexColor::try_from(hex.trim()).map_err(|()| FeedError::MissingColor)
}
