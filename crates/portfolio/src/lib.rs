//! # BullBoard Portfolio Aggregation
//!
//! This crate reduces the close-price series of several selected symbols to
//! one equal-weighted portfolio summary. Symbol series rarely share an
//! identical trading calendar, so the reduction first outer-aligns the
//! series on the union of their dates, forward-fills gaps, and restricts to
//! the dates where every symbol has a price. Too little overlap is a normal
//! outcome (`PortfolioOutcome::InsufficientOverlap`), not an error.

pub mod alignment;
pub mod error;
pub mod summary;

pub use alignment::{align_and_fill, AlignedCloses};
pub use error::PortfolioError;
pub use summary::{summarize_portfolio, PortfolioOutcome, PortfolioSummary};
