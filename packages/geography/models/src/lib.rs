#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static geographic reference data for New Mexico.
//!
//! Two tables live here: the sales-territory [`regions`] that group cities
//! for filtering and statistics, and the [`centroids`] used as a
//! last-resort map anchor when a location has no better coordinate.

pub mod centroids;
pub mod regions;
