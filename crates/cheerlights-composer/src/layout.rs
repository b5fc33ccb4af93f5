//! Strip geometry
//!
//! Every history entry reserves `segment_length + gap_length` pixels of the
//! strip, which bounds how many colors the history may hold.

use thiserror_no_std::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("strip length must be at least one pixel")]
    EmptyStrip,
    #[error("segment length must be at least one pixel")]
    EmptySegment,
    #[error("layout is for {layout} pixels but the frame holds {frame}")]
    LengthMismatch { layout: usize, frame: usize },
}

/// Strip geometry shared by the history store and the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    strip_length: usize,
    segment_length: usize,
    gap_length: usize,
}

impl StripLayout {
    pub const fn new(
        strip_length: usize,
        segment_length: usize,
        gap_length: usize,
    ) -> Result<Self, LayoutError> {
        if strip_length == 0 {
            return Err(LayoutError::EmptyStrip);
        }
        if segment_length == 0 {
            return Err(LayoutError::EmptySegment);
        }
        Ok(Self {
            strip_length,
            segment_length,
            gap_length,
        })
    }

    pub const fn strip_length(&self) -> usize {
        self.strip_length
    }

    pub const fn segment_length(&self) -> usize {
        self.segment_length
    }

    pub const fn gap_length(&self) -> usize {
        self.gap_length
    }

    /// Pixels reserved per history entry
    pub const fn pitch(&self) -> usize {
        self.segment_length + self.gap_length
    }

    /// Whether `entries` colors fit on the strip
    pub const fn fits(&self, entries: usize) -> bool {
        entries * self.pitch() <= self.strip_length
    }

    /// Largest history length the strip can display
    pub const fn max_entries(&self) -> usize {
        self.strip_length / self.pitch()
    }
}
