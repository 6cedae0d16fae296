//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data including:
//! - Real Las Vegas places grouped by category (from OpenStreetMap)
//! - Request builders and stub collaborators

#![allow(dead_code)]

pub mod las_vegas_places;
pub mod stubs;

pub use las_vegas_places::*;
pub use stubs::*;
