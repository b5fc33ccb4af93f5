pub mod strip;

pub use strip::{StripInitError, StripParts, init_strip, strip_task};
