//! # BullBoard Rolling Analytics
//!
//! This crate turns validated per-symbol price series into rolling
//! risk/return metrics. It is the computational heart of the system.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator over immutable input series. Metrics that lack enough
//!   trailing history come out as `None`, never as a panic and never as a
//!   silent zero.
//!
//! ## Public API
//!
//! - `filter_sufficient`: the sufficiency gate run before any computation.
//! - `AnalyticsEngine`: per-symbol rolling metric computation.
//! - `AnalyticsError`: the specific error types that can be returned here.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod gate;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use gate::{filter_sufficient, SufficiencyReport};
