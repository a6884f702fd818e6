//! Flight path planning for autonomous aerial vehicles.
//!
//! The planners share one set of geodetic primitives:
//! - [`diversion`] routes around a buffered restricted polygon and back to a
//!   rejoin point (visibility graph + Dijkstra).
//! - [`coverage`] lays concentric search rings over a circular area,
//!   optionally split into sectors for several vehicles.
//! - [`itinerary`] orders a few targets into the shortest set of round trips
//!   from a home point.
//!
//! Every planner is a pure function of its inputs and returns an ordered
//! waypoint list for the mission encoder.

pub mod coverage;
pub mod diversion;
pub mod error;
pub mod footprint;
pub mod geometry;
pub mod itinerary;
pub mod models;
pub mod shortest_path;
pub mod visibility;

pub use coverage::{
    generate_search_path, generate_search_path_sector, CoveragePlanner, SearchRing,
    MAX_SEARCH_WAYPOINTS,
};
pub use diversion::{diversion_route, plan_diversion, DiversionPlan};
pub use error::{ErrorKind, GeometryError, PlanError, RouteError};
pub use footprint::CameraModel;
pub use geometry::{
    buffer_polygon, distance, offset, path_length, segment_intersects_polygon,
    segments_intersect,
};
pub use itinerary::{itinerary_length, plan_itinerary, MAX_ITINERARY_TARGETS};
pub use models::{Footprint, Position, RestrictedZone, SearchSector};
pub use shortest_path::{dijkstra, ShortestPath};
pub use visibility::{NodeId, VisibilityGraph, VisibilityNode, WeightedEdge};
