#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View computation for the dispensary sales dashboard.
//!
//! The presentation shell owns no engine state. It builds a [`ViewConfig`]
//! from whatever the user has selected and calls [`compute_view`], which
//! returns filtered, sorted rows, map placements for the location view,
//! and summary statistics. Sparkline geometry is computed per row from
//! the result with [`sparkline::plot`].

pub mod config;
pub mod filter;
pub mod sort;
pub mod sparkline;
pub mod view;

pub use config::{ConfigError, EngineConfig};
pub use filter::{FilterCriteria, TrendFilter};
pub use sort::{SortColumn, SortDirection, SortSpec};
pub use sparkline::{PlotPoint, SparklineFrame};
pub use view::{MappedLocation, ViewConfig, ViewMode, ViewOutput, ViewRows, compute_view};
