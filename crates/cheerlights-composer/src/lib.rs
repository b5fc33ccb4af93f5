#![no_std]

//! Color history engine for a scrolling LED strip
//!
//! Architecture layers:
//! - `color` - Color type and hex parsing
//! - `layout` - Strip geometry (segment and gap sizes)
//! - `history` - Bounded color history shared between tasks
//! - `driver` - Hardware abstraction (`[LedDriver]` trait)
//! - `feed` - Remote color source abstraction (`[ColorFeed]` trait)
//! - `processor` - Output processing (brightness)
//! - `poller` - Periodic feed polling into the history
//! - `renderer` - Scroll animation loop
//! - `lifecycle` - Start/stop coordination and persistence
//!
//! The engine is generic over `LedDriver` and `ColorFeed`, allowing different
//! hardware and network backends.

extern crate alloc;

pub mod color;
pub mod driver;
pub mod feed;
pub mod history;
pub mod layout;
pub mod lifecycle;
pub mod poller;
pub mod processor;
pub mod renderer;
pub mod shutdown;

pub use color::{HexColorError, Rgb, hex_to_rgb};
pub use driver::LedDriver;
pub use feed::{ColorFeed, HexColor};
pub use history::{
    HistoryBuffer, HistoryDecodeError, HistoryEncodeError, HistorySnapshot, HistoryStore,
};
pub use layout::{LayoutError, StripLayout};
pub use lifecycle::{HistoryRepository, Lifecycle, LifecycleError, LifecycleState};
pub use poller::{ColorPoller, PollError};
pub use processor::Brightness;
pub use renderer::{RendererConfig, ScrollPosition, StripRenderer, render_frame};
pub use shutdown::ShutdownToken;
