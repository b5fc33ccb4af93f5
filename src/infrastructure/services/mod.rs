mod cheerlights;

pub use cheerlights::{CheerlightsFeed, FeedError};
