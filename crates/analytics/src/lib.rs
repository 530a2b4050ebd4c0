//! # MaxVariance Analytics Engine
//!
//! This crate turns a log of poker sessions into the statistics the rest of the
//! system serves: summaries, bucketed breakdowns and rolling trends.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage,
//!   caching or HTTP. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** Every aggregator takes an immutable slice of
//!   `Session`s and returns a freshly allocated, serializable report. Aggregators
//!   are independent of each other and can run in any order or in parallel.
//! - **Defaults over failure:** Missing numbers count as zero, missing parameters
//!   fall back to documented defaults, and every division is guarded.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: facade carrying the configured defaults.
//! - `filter_sessions`, `summarize`, `bucket_by_duration`, `bucket_by_day_of_week`,
//!   `group_by_game_type`, `compute_trends`: the individual aggregators.
//! - `unit_value` / `money_from_units`: stakes-based unit conversion.
//! - `AnalyticsError`: returned when the engine is configured with unusable settings.

// Declare the modules that constitute this crate.
pub mod buckets;
pub mod engine;
pub mod error;
pub mod filter;
pub mod groups;
pub mod metrics;
pub mod report;
pub mod summary;
pub mod trends;
pub mod units;

// Re-export the key components to create a clean, public-facing API.
pub use buckets::{DEFAULT_DURATION_BOUNDARIES, DurationBoundaries, bucket_by_day_of_week, bucket_by_duration};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::{FilterCriteria, filter_sessions};
pub use groups::group_by_game_type;
pub use report::{
    BucketStats, CashGroup, CashStats, CombinedStats, DayBucket, DurationBucket, GameTypeGroup,
    SessionReport, SummaryReport, TimeOfDay, TournamentGroup, TournamentStats, TrendPoint,
    TrendReport,
};
pub use summary::summarize;
pub use trends::{DEFAULT_WINDOW_SIZE, compute_trends};
pub use units::{apply_unit_value, money_from_units, unit_value};
