//! Infrastructure layer
//!
//! Linux implementations of the composer's collaborators: the SPI pixel
//! sink, the CheerLights HTTP feed, the history file and signal handling.

pub mod drivers;
pub mod repositories;
pub mod services;
pub mod signals;
pub mod tasks;
pub mod types;
