//! Bounded color history
//!
//! [`HistoryBuffer`] holds the colors in insertion order and enforces the two
//! history invariants on every append:
//! - no two adjacent entries are equal
//! - `len * (segment_length + gap_length) <= strip_length`
//!
//! [`HistoryStore`] wraps the buffer in a blocking mutex so the poller can
//! append while the renderer takes snapshots. Neither operation suspends, so
//! a snapshot never observes a half-applied append.

mod codec;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::{Deque, Vec};

use crate::color::Rgb;
use crate::layout::StripLayout;

pub use codec::{HistoryDecodeError, HistoryEncodeError};

/// Immutable copy of the history, oldest color first
pub type HistorySnapshot<const N: usize> = Vec<Rgb, N>;

/// Color history with at most `N` stored entries
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const N: usize> {
    colors: Deque<Rgb, N>,
    layout: StripLayout,
}

impl<const N: usize> HistoryBuffer<N> {
    pub const fn new(layout: StripLayout) -> Self {
        Self {
            colors: Deque::new(),
            layout,
        }
    }

    /// Rebuild a history from colors in order, replaying every append
    pub fn from_colors<I>(layout: StripLayout, colors: I) -> Self
    where
        I: IntoIterator<Item = Rgb>,
    {
        let mut history = Self::new(layout);
        for color in colors {
            history.append(color);
        }
        history
    }

    /// Append a color unless it repeats the newest entry.
    ///
    /// Evicts the oldest entries until the history fits the strip again.
    /// Returns whether the color is now held, which is `false` for a repeat
    /// and for a strip too short to show even one segment.
    pub fn append(&mut self, color: Rgb) -> bool {
        if self.colors.back() == Some(&color) {
            return false;
        }

        if self.colors.is_full() {
            self.colors.pop_front();
        }
        if self.colors.push_back(color).is_err() {
            return false;
        }

        while !self.layout.fits(self.colors.len()) {
            self.colors.pop_front();
        }
        !self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Newest color
    pub fn last(&self) -> Option<Rgb> {
        self.colors.back().copied()
    }

    pub fn layout(&self) -> StripLayout {
        self.layout
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.colors.iter().copied()
    }

    pub fn snapshot(&self) -> HistorySnapshot<N> {
        self.iter().collect()
    }
}

/// History shared between the poller (writer) and the renderer (reader)
pub struct HistoryStore<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<HistoryBuffer<N>>>,
}

impl<const N: usize> HistoryStore<N> {
    pub const fn new(layout: StripLayout) -> Self {
        Self::from_buffer(HistoryBuffer::new(layout))
    }

    pub const fn from_buffer(buffer: HistoryBuffer<N>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(buffer)),
        }
    }

    /// See [`HistoryBuffer::append`]
    pub fn append(&self, color: Rgb) -> bool {
        self.inner.lock(|history| history.borrow_mut().append(color))
    }

    pub fn snapshot(&self) -> HistorySnapshot<N> {
        self.inner.lock(|history| history.borrow().snapshot())
    }

    /// Copy of the whole buffer, used for persistence
    pub fn buffer(&self) -> HistoryBuffer<N> {
        self.inner.lock(|history| history.borrow().clone())
    }

    /// Swap in a restored history
    pub fn replace(&self, buffer: HistoryBuffer<N>) {
        self.inner.lock(|history| *history.borrow_mut() = buffer);
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|history| history.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn layout(&self) -> StripLayout {
        self.inner.lock(|history| history.borrow().layout())
    }
}
