//! itinerary-planner core
//!
//! Plans a single day by fitting loosely specified activity requests
//! ("a café", "a grocery stop") into the free time between fixed
//! commitments, choosing a concrete place and window for each.

pub mod analysis;
pub mod config;
pub mod error;
pub mod gaps;
pub mod geo;
pub mod model;
pub mod osrm;
pub mod planner;
pub mod scoring;
pub mod solver;
pub mod telemetry;
pub mod traits;

pub use config::PlannerConfig;
pub use error::{CollaboratorError, PlanError};
pub use solver::optimize;
