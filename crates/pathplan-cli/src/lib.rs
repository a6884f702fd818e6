//! Pathplan CLI - reads mission parameters as JSON and prints planned
//! waypoints.
//!
//! - `pathplan divert`: route around a restricted zone
//! - `pathplan search`: concentric-ring search pattern, optionally one sector
//! - `pathplan visit`: round trips from a home point to a few targets

pub mod cli;
pub mod config;
pub mod request;

pub use cli::{Args, Command};
pub use config::Settings;
pub use request::{
    divert, search, visit, DiversionRequest, ItineraryRequest, PlanOutput, SearchRequest,
};
