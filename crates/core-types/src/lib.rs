pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{group_by_symbol, AnalyticsRow, RawBar, SymbolSeries};
