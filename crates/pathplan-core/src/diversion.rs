//! Diversion routing around a restricted zone.
//!
//! Called mid-flight when a diversion is ordered: produce waypoints from the
//! vehicle's current position to the rejoin point that never cut through the
//! buffered zone.

use crate::error::RouteError;
use crate::geometry::{buffer_polygon, path_length, segment_intersects_polygon};
use crate::models::{Position, RestrictedZone};
use crate::shortest_path::dijkstra;
use crate::visibility::{NodeId, VisibilityGraph};
use serde::{Deserialize, Serialize};

/// A planned diversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversionPlan {
    /// Starts with the current position and ends with the rejoin point.
    pub waypoints: Vec<Position>,
    pub distance_m: f64,
    /// True when the straight line already clears the zone.
    pub direct: bool,
}

/// Waypoints from `current` to `rejoin` that keep clear of `restricted`.
pub fn diversion_route(
    current: Position,
    rejoin: Position,
    restricted: &RestrictedZone,
) -> Result<Vec<Position>, RouteError> {
    plan_diversion(current, rejoin, restricted).map(|plan| plan.waypoints)
}

/// Like [`diversion_route`], also reporting length and whether the direct
/// path was taken.
pub fn plan_diversion(
    current: Position,
    rejoin: Position,
    restricted: &RestrictedZone,
) -> Result<DiversionPlan, RouteError> {
    current.validate()?;
    rejoin.validate()?;

    if restricted.vertices.is_empty() {
        return Ok(direct_plan(current, rejoin));
    }
    if !restricted.margin_m.is_finite() || restricted.margin_m <= 0.0 {
        return Err(RouteError::InvalidInput(format!(
            "restricted zone margin must be positive, got {} m",
            restricted.margin_m
        )));
    }

    let buffered = buffer_polygon(restricted.open_ring(), restricted.margin_m)?;
    if !segment_intersects_polygon(current, rejoin, &buffered) {
        tracing::debug!("direct path clears the restricted zone");
        return Ok(direct_plan(current, rejoin));
    }

    let graph = VisibilityGraph::from_buffered(current, rejoin, buffered);
    let shortest = dijkstra(&graph, NodeId::START, NodeId::GOAL).inspect_err(|err| {
        tracing::warn!(
            current = ?current,
            rejoin = ?rejoin,
            "diversion failed: {err}"
        );
    })?;

    let mut waypoints = Vec::with_capacity(shortest.nodes.len());
    for id in &shortest.nodes {
        let waypoint = match *id {
            NodeId::START => current,
            NodeId::GOAL => rejoin,
            corner => graph
                .position(corner)
                .ok_or_else(|| {
                    RouteError::InvalidInput(format!("path refers to unknown node {}", corner.index()))
                })?
                .with_altitude(current.altitude_m),
        };
        waypoints.push(waypoint);
    }

    tracing::debug!(
        waypoints = waypoints.len(),
        distance_m = shortest.distance_m,
        "planned diversion"
    );

    Ok(DiversionPlan {
        waypoints,
        distance_m: shortest.distance_m,
        direct: false,
    })
}

fn direct_plan(current: Position, rejoin: Position) -> DiversionPlan {
    let waypoints = vec![current, rejoin];
    DiversionPlan {
        distance_m: path_length(&waypoints),
        waypoints,
        direct: true,
    }
}
