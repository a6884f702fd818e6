//! Camera ground footprint from altitude and field of view.

use crate::error::PlanError;
use crate::models::Footprint;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Measured horizontal field of view of the search camera, radians.
pub const DEFAULT_FOV_X_RAD: f64 = 0.64889;
/// Measured vertical field of view of the search camera, radians.
pub const DEFAULT_FOV_Y_RAD: f64 = 0.41438;

/// Pinhole camera described by its full field-of-view angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    pub fov_x_rad: f64,
    pub fov_y_rad: f64,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            fov_x_rad: DEFAULT_FOV_X_RAD,
            fov_y_rad: DEFAULT_FOV_Y_RAD,
        }
    }
}

impl CameraModel {
    pub fn from_degrees(fov_x_deg: f64, fov_y_deg: f64) -> Self {
        Self {
            fov_x_rad: fov_x_deg.to_radians(),
            fov_y_rad: fov_y_deg.to_radians(),
        }
    }

    /// Ground rectangle seen from `altitude_m` with the camera tilted by
    /// `frustum_x_rad` (left/right) and `frustum_y_rad` (up/down) from
    /// vertical.
    ///
    /// Each side is `altitude · (tan(fov/2 − tilt) + tan(fov/2 + tilt))`.
    pub fn footprint(
        &self,
        altitude_m: f64,
        frustum_x_rad: f64,
        frustum_y_rad: f64,
    ) -> Result<Footprint, PlanError> {
        if !altitude_m.is_finite() || altitude_m < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "altitude must be non-negative, got {altitude_m} m"
            )));
        }
        let width_m = ground_span(altitude_m, self.fov_x_rad, frustum_x_rad, "horizontal")?;
        let height_m = ground_span(altitude_m, self.fov_y_rad, frustum_y_rad, "vertical")?;
        Ok(Footprint { width_m, height_m })
    }

    /// Footprint looking straight down.
    pub fn nadir_footprint(&self, altitude_m: f64) -> Result<Footprint, PlanError> {
        self.footprint(altitude_m, 0.0, 0.0)
    }
}

fn ground_span(altitude_m: f64, fov_rad: f64, tilt_rad: f64, axis: &str) -> Result<f64, PlanError> {
    if !fov_rad.is_finite() || !tilt_rad.is_finite() || fov_rad < 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "{axis} field of view {fov_rad} rad with tilt {tilt_rad} rad is not usable"
        )));
    }
    let near = fov_rad / 2.0 - tilt_rad;
    let far = fov_rad / 2.0 + tilt_rad;
    if near.abs() >= FRAC_PI_2 || far.abs() >= FRAC_PI_2 {
        return Err(PlanError::InvalidInput(format!(
            "{axis} view edge reaches the horizon (fov {fov_rad} rad, tilt {tilt_rad} rad)"
        )));
    }
    Ok(altitude_m * (near.tan() + far.tan()))
}
