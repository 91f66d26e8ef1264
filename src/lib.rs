pub mod config;
pub mod feed;
pub mod view;

pub use config::FeedConfig;
pub use feed::{EventFeedClient, FeedClient};
