//! Persisted history format
//!
//! The history is stored as a JSON list of `[r, g, b]` triples, oldest first:
//!
//! ```text
//! [[255,0,0],[0,128,0]]
//! ```
//!
//! Files written by the older tuple format (`[(255, 0, 0), (0, 128, 0)]`)
//! are accepted on load.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use log::warn;
use thiserror_no_std::Error;

use super::HistoryBuffer;
use crate::color::Rgb;
use crate::layout::StripLayout;

/// Longest encoded entry: `[255,255,255],`
const ENCODED_ENTRY_LEN: usize = 14;

#[derive(Debug, Error)]
pub enum HistoryDecodeError {
    #[error("history is not valid UTF-8")]
    InvalidEncoding,
    #[error("malformed history: {0:?}")]
    Malformed(serde_json_core::de::Error),
}

#[derive(Debug, Error)]
pub enum HistoryEncodeError {
    #[error("history serialization failed: {0:?}")]
    Serialization(serde_json_core::ser::Error),
}

impl<const N: usize> HistoryBuffer<N> {
    /// Serialize the history so that [`HistoryBuffer::load`] restores it exactly
    pub fn encode(&self) -> Result<String, HistoryEncodeError> {
        let entries: Vec<[u8; 3]> = self.iter().map(|c| [c.r, c.g, c.b]).collect();
        let mut buffer = vec![0u8; entries.len() * ENCODED_ENTRY_LEN + 2];
        let len = serde_json_core::to_slice(&entries, &mut buffer)
            .map_err(HistoryEncodeError::Serialization)?;
        buffer.truncate(len);

        // serde-json-core only emits ASCII for integer arrays
        Ok(buffer.into_iter().map(char::from).collect())
    }

    /// Parse a persisted history.
    ///
    /// Entries are replayed through [`HistoryBuffer::append`], so a
    /// hand-edited file still produces a history that honors the invariants.
    pub fn decode(layout: StripLayout, data: &[u8]) -> Result<Self, HistoryDecodeError> {
        if core::str::from_utf8(data).is_err() {
            return Err(HistoryDecodeError::InvalidEncoding);
        }

        let normalized: Vec<u8> = data
            .iter()
            .map(|byte| match byte {
                b'(' => b'[',
                b')' => b']',
                other => *other,
            })
            .collect();

        let (entries, _) = serde_json_core::from_slice::<Vec<[u8; 3]>>(&normalized)
            .map_err(HistoryDecodeError::Malformed)?;

        Ok(Self::from_colors(
            layout,
            entries.into_iter().map(|[r, g, b]| Rgb::new(r, g, b)),
        ))
    }

    /// Best-effort [`HistoryBuffer::decode`]: malformed data yields an empty history
    pub fn load(layout: StripLayout, data: &[u8]) -> Self {
        Self::decode(layout, data).unwrap_or_else(|err| {
            warn!("history: discarding persisted colors: {}", err);
            Self::new(layout)
        })
    }
}
