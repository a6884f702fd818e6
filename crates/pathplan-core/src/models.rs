//! Core data models for the planners.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// A geodetic position. `altitude_m` is carried through untouched so the
/// mission encoder can use it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    #[serde(default, alias = "alt", alias = "altitude")]
    pub altitude_m: f64,
}

impl Position {
    /// Create a validated position.
    pub fn new(latitude: f64, longitude: f64, altitude_m: f64) -> Result<Self, GeometryError> {
        let position = Self {
            latitude,
            longitude,
            altitude_m,
        };
        position.validate()?;
        Ok(position)
    }

    /// Check the latitude/longitude range invariant.
    ///
    /// Positions built from struct literals or deserialized from mission
    /// parameters bypass [`Position::new`], so the planners call this on
    /// every input.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeometryError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeometryError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.altitude_m.is_finite() {
            return Err(GeometryError::InvalidInput(format!(
                "altitude {} is not finite",
                self.altitude_m
            )));
        }
        Ok(())
    }

    /// Same horizontal position at a different altitude.
    pub fn with_altitude(self, altitude_m: f64) -> Self {
        Self { altitude_m, ..self }
    }
}

/// A forbidden polygon plus the safety margin kept around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedZone {
    /// Polygon vertices in boundary order. A repeated closing vertex is allowed.
    pub vertices: Vec<Position>,
    /// Outward buffer in meters.
    #[serde(alias = "buffer_m")]
    pub margin_m: f64,
}

impl RestrictedZone {
    pub fn new(vertices: Vec<Position>, margin_m: f64) -> Self {
        Self { vertices, margin_m }
    }

    /// Vertices with a duplicated closing vertex (first == last) removed.
    pub fn open_ring(&self) -> &[Position] {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) if self.vertices.len() > 1 && same_point(first, last) => {
                &self.vertices[..self.vertices.len() - 1]
            }
            _ => &self.vertices,
        }
    }
}

fn same_point(a: &Position, b: &Position) -> bool {
    a.latitude == b.latitude && a.longitude == b.longitude
}

/// Ground-projected sensor footprint in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width_m: f64,
    pub height_m: f64,
}

impl Footprint {
    pub fn new(width_m: f64, height_m: f64) -> Self {
        Self { width_m, height_m }
    }
}

impl From<(f64, f64)> for Footprint {
    /// `(width, height)`
    fn from((width_m, height_m): (f64, f64)) -> Self {
        Self { width_m, height_m }
    }
}

/// Which angular slice of the search area a vehicle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSector {
    /// 0-based
    pub drone_index: u32,
    pub drone_count: u32,
}

impl SearchSector {
    pub fn new(drone_index: u32, drone_count: u32) -> Result<Self, GeometryError> {
        let sector = Self {
            drone_index,
            drone_count,
        };
        sector.validate()?;
        Ok(sector)
    }

    /// The whole circle for a single vehicle.
    pub fn whole() -> Self {
        Self {
            drone_index: 0,
            drone_count: 1,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.drone_count == 0 {
            return Err(GeometryError::InvalidInput(
                "drone count must be at least 1".to_string(),
            ));
        }
        if self.drone_index >= self.drone_count {
            return Err(GeometryError::InvalidInput(format!(
                "drone index {} out of range for {} drones",
                self.drone_index, self.drone_count
            )));
        }
        Ok(())
    }

    /// Half-open range of point indices `[start, end)` this sector owns on a
    /// ring of `points` evenly spaced points. Point `k` sits at angle
    /// `2πk / points`; the last sector runs to `points` and absorbs the rest.
    pub fn point_range(&self, points: usize) -> (usize, usize) {
        let count = self.drone_count as usize;
        let index = self.drone_index as usize;
        let start = (index * points).div_ceil(count);
        let end = if index + 1 == count {
            points
        } else {
            ((index + 1) * points).div_ceil(count)
        };
        (start, end)
    }
}
