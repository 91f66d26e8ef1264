//! Text rendering of the live feed page and the prompt tester.

pub mod feed;
pub mod tester;

pub use feed::{render_row, ConnectionStatus, FeedView};
pub use tester::CheckOutcome;
