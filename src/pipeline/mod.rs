//! Pipeline entry points for relay operations.
//!
//! - `run_cycle`: Load state, fetch the listing, deliver new articles, save
//! - `new_articles` / `order_for_delivery`: Diff and delivery ordering

pub mod diff;
pub mod run;

pub use diff::{new_articles, order_for_delivery};
pub use run::{RunOutcome, RunSummary, run_cycle};
