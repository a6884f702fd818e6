//! JSON mission parameters and planned output.

use anyhow::{Context, Result};
use pathplan_core::{
    path_length, plan_diversion, plan_itinerary, CameraModel, CoveragePlanner, Footprint,
    Position, RestrictedZone, SearchSector,
};
use serde::{Deserialize, Serialize};

/// Divert from `current` to `rejoin` around `zone`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiversionRequest {
    pub current: Position,
    pub rejoin: Position,
    pub zone: RestrictedZone,
}

/// Search around `centre`, whole circle unless `sector` is given.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub centre: Position,
    pub search_radius_m: f64,
    pub footprint: FootprintSource,
    #[serde(default)]
    pub sector: Option<SearchSector>,
}

/// Visit every target from `origin`, at most `targets_per_trip` per sortie.
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryRequest {
    pub origin: Position,
    pub targets: Vec<Position>,
    #[serde(default = "default_targets_per_trip")]
    pub targets_per_trip: usize,
}

fn default_targets_per_trip() -> usize {
    2
}

/// Footprint given directly or derived from the camera at a flight altitude.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FootprintSource {
    Measured(Footprint),
    Camera {
        altitude_m: f64,
        #[serde(default)]
        camera: CameraModel,
        #[serde(default)]
        frustum_x_rad: f64,
        #[serde(default)]
        frustum_y_rad: f64,
    },
}

impl FootprintSource {
    pub fn resolve(&self) -> Result<Footprint> {
        match self {
            Self::Measured(footprint) => Ok(*footprint),
            Self::Camera {
                altitude_m,
                camera,
                frustum_x_rad,
                frustum_y_rad,
            } => camera
                .footprint(*altitude_m, *frustum_x_rad, *frustum_y_rad)
                .context("deriving camera footprint"),
        }
    }
}

/// What the CLI prints on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutput {
    pub waypoints: Vec<Position>,
    pub distance_m: f64,
}

pub fn divert(request: &DiversionRequest) -> Result<PlanOutput> {
    let plan = plan_diversion(request.current, request.rejoin, &request.zone)
        .context("planning diversion")?;
    tracing::info!(
        waypoints = plan.waypoints.len(),
        distance_m = plan.distance_m,
        direct = plan.direct,
        "diversion planned"
    );
    Ok(PlanOutput {
        waypoints: plan.waypoints,
        distance_m: plan.distance_m,
    })
}

pub fn search(request: &SearchRequest, planner: &CoveragePlanner) -> Result<PlanOutput> {
    let footprint = request.footprint.resolve()?;
    let sector = request.sector.unwrap_or_else(SearchSector::whole);
    let waypoints = planner
        .sector_path(request.centre, request.search_radius_m, footprint, sector)
        .context("planning search pattern")?;
    let distance_m = path_length(&waypoints);
    tracing::info!(
        waypoints = waypoints.len(),
        distance_m,
        width_m = footprint.width_m,
        height_m = footprint.height_m,
        "search pattern planned"
    );
    Ok(PlanOutput {
        waypoints,
        distance_m,
    })
}

pub fn visit(request: &ItineraryRequest) -> Result<PlanOutput> {
    let waypoints = plan_itinerary(request.origin, &request.targets, request.targets_per_trip)
        .context("planning itinerary")?;
    let distance_m = path_length(&waypoints);
    tracing::info!(
        targets = request.targets.len(),
        waypoints = waypoints.len(),
        distance_m,
        "itinerary planned"
    );
    Ok(PlanOutput {
        waypoints,
        distance_m,
    })
}
