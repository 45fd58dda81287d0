#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sales-trend analysis for dispensary records.
//!
//! [`trend`] classifies a monthly sales series into a direction, growth
//! rate, and confidence under a configurable [`TrendPolicy`].
//! [`aggregate`] folds location records into company rollups and runs
//! the same classifier over each merged series. [`stats`] produces the
//! coarse-bucket counts shown alongside the active view.

pub mod aggregate;
pub mod stats;
pub mod trend;

pub use aggregate::aggregate;
pub use stats::{regional_stats, summarize};
pub use trend::{TrendPolicy, classify, classify_totals};
