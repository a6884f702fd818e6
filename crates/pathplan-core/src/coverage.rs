//! Concentric-ring search patterns.
//!
//! Rings start half a footprint width from the centre and step out by one
//! width until the search radius is reached. Waypoints on each ring are
//! spaced so consecutive camera footprints overlap, and the direction
//! alternates ring to ring so the vehicle steps straight out to the next one.
//! Several vehicles can split the area into equal angular sectors.

use crate::error::PlanError;
use crate::geometry::offset;
use crate::models::{Footprint, Position, SearchSector};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Upper bound on the waypoints one search pattern may hold.
pub const MAX_SEARCH_WAYPOINTS: usize = 1_000_000;

/// Tuning for ring spacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveragePlanner {
    /// Extra waypoint density so adjacent footprints overlap.
    pub overlap_multiplier: f64,
    /// Fewest waypoints placed on any ring.
    pub min_points_per_ring: usize,
}

impl Default for CoveragePlanner {
    fn default() -> Self {
        Self {
            overlap_multiplier: 1.2,
            min_points_per_ring: 3,
        }
    }
}

/// One ring of a search pattern as flown by one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRing {
    /// 0 for the innermost ring.
    pub index: usize,
    pub radius_m: f64,
    /// Points on the full ring, before sector partitioning.
    pub points_per_ring: usize,
    pub clockwise: bool,
    pub waypoints: Vec<Position>,
}

impl CoveragePlanner {
    /// Rings covering the full circle for a single vehicle.
    pub fn rings(
        &self,
        centre: Position,
        search_radius_m: f64,
        footprint: impl Into<Footprint>,
    ) -> Result<Vec<SearchRing>, PlanError> {
        self.sector_rings(centre, search_radius_m, footprint, SearchSector::whole())
    }

    /// Rings restricted to one vehicle's angular sector.
    pub fn sector_rings(
        &self,
        centre: Position,
        search_radius_m: f64,
        footprint: impl Into<Footprint>,
        sector: SearchSector,
    ) -> Result<Vec<SearchRing>, PlanError> {
        let footprint = footprint.into();
        self.validate(centre, search_radius_m, footprint)?;
        sector.validate()?;
        self.check_size(search_radius_m, footprint)?;

        let mut rings = Vec::new();
        let mut index = 0usize;
        loop {
            let radius_m = footprint.width_m / 2.0 + index as f64 * footprint.width_m;
            if radius_m > search_radius_m {
                break;
            }

            let points_per_ring = self.points_per_ring(radius_m, footprint);
            let (first, end) = sector.point_range(points_per_ring);
            let clockwise = index % 2 == 0;

            let mut waypoints = Vec::with_capacity(end - first);
            for k in first..end {
                waypoints.push(ring_point(centre, radius_m, k, points_per_ring)?);
            }
            // Angles grow counter-clockwise, so clockwise rings run backwards.
            if clockwise {
                waypoints.reverse();
            }

            rings.push(SearchRing {
                index,
                radius_m,
                points_per_ring,
                clockwise,
                waypoints,
            });
            index += 1;
        }

        tracing::debug!(
            rings = rings.len(),
            drone_index = sector.drone_index,
            drone_count = sector.drone_count,
            "generated search rings"
        );
        Ok(rings)
    }

    /// Flattened waypoints for a single vehicle covering the whole circle.
    pub fn search_path(
        &self,
        centre: Position,
        search_radius_m: f64,
        footprint: impl Into<Footprint>,
    ) -> Result<Vec<Position>, PlanError> {
        self.sector_path(centre, search_radius_m, footprint, SearchSector::whole())
    }

    /// Flattened waypoints for one vehicle's sector.
    pub fn sector_path(
        &self,
        centre: Position,
        search_radius_m: f64,
        footprint: impl Into<Footprint>,
        sector: SearchSector,
    ) -> Result<Vec<Position>, PlanError> {
        Ok(self
            .sector_rings(centre, search_radius_m, footprint, sector)?
            .into_iter()
            .flat_map(|ring| ring.waypoints)
            .collect())
    }

    /// `max(min, ceil(overlap * max(C / height, C / width)))`
    pub fn points_per_ring(&self, radius_m: f64, footprint: Footprint) -> usize {
        let circumference = TAU * radius_m;
        let along = (circumference / footprint.height_m).max(circumference / footprint.width_m);
        let needed = (self.overlap_multiplier * along).ceil() as usize;
        needed.max(self.min_points_per_ring)
    }

    fn validate(
        &self,
        centre: Position,
        search_radius_m: f64,
        footprint: Footprint,
    ) -> Result<(), PlanError> {
        centre.validate()?;
        if !(footprint.width_m.is_finite() && footprint.width_m > 0.0)
            || !(footprint.height_m.is_finite() && footprint.height_m > 0.0)
        {
            return Err(PlanError::InvalidInput(format!(
                "footprint must be positive, got {} x {} m",
                footprint.width_m, footprint.height_m
            )));
        }
        if !search_radius_m.is_finite() || search_radius_m < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "search radius must be non-negative, got {search_radius_m} m"
            )));
        }
        if !self.overlap_multiplier.is_finite() || self.overlap_multiplier <= 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "overlap multiplier must be positive, got {}",
                self.overlap_multiplier
            )));
        }
        if self.min_points_per_ring < 3 {
            return Err(PlanError::InvalidInput(format!(
                "rings need at least 3 points, configured {}",
                self.min_points_per_ring
            )));
        }
        Ok(())
    }

    /// Rejects patterns larger than [`MAX_SEARCH_WAYPOINTS`] before any ring
    /// is allocated. Every ring holds at most as many points as the outermost.
    fn check_size(&self, search_radius_m: f64, footprint: Footprint) -> Result<(), PlanError> {
        let first_m = footprint.width_m / 2.0;
        if search_radius_m < first_m {
            return Ok(());
        }
        let rings = ((search_radius_m - first_m) / footprint.width_m).floor() + 1.0;
        let outer_m = first_m + (rings - 1.0) * footprint.width_m;
        let outer_points = (self.overlap_multiplier * TAU * outer_m
            / footprint.width_m.min(footprint.height_m))
        .ceil()
        .max(self.min_points_per_ring as f64);
        let bound = rings * outer_points;
        if bound > MAX_SEARCH_WAYPOINTS as f64 {
            return Err(PlanError::InvalidInput(format!(
                "a {search_radius_m} m search with a {} x {} m footprint needs up to {bound:.0} \
                 waypoints, more than {MAX_SEARCH_WAYPOINTS}",
                footprint.width_m, footprint.height_m
            )));
        }
        Ok(())
    }
}

/// Point `k` of `n` evenly spaced around a ring, counter-clockwise from east.
fn ring_point(centre: Position, radius_m: f64, k: usize, n: usize) -> Result<Position, PlanError> {
    let angle = TAU * k as f64 / n as f64;
    Ok(offset(centre, radius_m * angle.cos(), radius_m * angle.sin())?)
}

/// Concentric-ring search path over the whole circle, default tuning.
pub fn generate_search_path(
    centre: Position,
    search_radius_m: f64,
    footprint: impl Into<Footprint>,
) -> Result<Vec<Position>, PlanError> {
    CoveragePlanner::default().search_path(centre, search_radius_m, footprint)
}

/// Search path for vehicle `drone_index` of `drone_count`, default tuning.
pub fn generate_search_path_sector(
    centre: Position,
    search_radius_m: f64,
    footprint: impl Into<Footprint>,
    drone_index: u32,
    drone_count: u32,
) -> Result<Vec<Position>, PlanError> {
    let sector = SearchSector::new(drone_index, drone_count)?;
    CoveragePlanner::default().sector_path(centre, search_radius_m, footprint, sector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::distance;

    fn centre() -> Position {
        Position::new(0.0, 0.0, 100.0).unwrap()
    }

    #[test]
    fn points_per_ring_formula() {
        let planner = CoveragePlanner::default();
        let footprint = Footprint::new(5.0, 5.0);
        // C = 2π·2.5 ≈ 15.71, /5 ≈ 3.14, ×1.2 ≈ 3.77
        assert_eq!(planner.points_per_ring(2.5, footprint), 4);
        // C ≈ 47.12, /5 ≈ 9.42, ×1.2 ≈ 11.31
        assert_eq!(planner.points_per_ring(7.5, footprint), 12);
        // Tiny ring still gets the minimum.
        assert_eq!(planner.points_per_ring(0.1, footprint), 3);
    }

    #[test]
    fn narrower_dimension_sets_density() {
        let planner = CoveragePlanner::default();
        let wide = planner.points_per_ring(10.0, Footprint::new(10.0, 2.0));
        let tall = planner.points_per_ring(10.0, Footprint::new(2.0, 10.0));
        assert_eq!(wide, tall);
        assert_eq!(wide, (1.2 * TAU * 10.0 / 2.0_f64).ceil() as usize);
    }

    #[test]
    fn rings_alternate_direction() {
        let rings = CoveragePlanner::default()
            .rings(centre(), 30.0, (5.0, 5.0))
            .unwrap();
        assert_eq!(rings.len(), 6);
        for ring in &rings {
            assert_eq!(ring.clockwise, ring.index % 2 == 0);
            assert_eq!(ring.waypoints.len(), ring.points_per_ring);
        }
    }

    #[test]
    fn consecutive_rings_start_near_previous_end() {
        let rings = CoveragePlanner::default()
            .rings(centre(), 30.0, (5.0, 5.0))
            .unwrap();
        for pair in rings.windows(2) {
            let end = *pair[0].waypoints.last().unwrap();
            let start = pair[1].waypoints[0];
            // The hop between rings is no longer than one footprint width
            // plus one step along the outer ring.
            let step = TAU * pair[1].radius_m / pair[1].points_per_ring as f64;
            assert!(distance(end, start) <= 5.0 + step + 0.1);
        }
    }

    #[test]
    fn ring_points_are_at_ring_radius() {
        let rings = CoveragePlanner::default()
            .rings(centre(), 20.0, (5.0, 5.0))
            .unwrap();
        for ring in &rings {
            for waypoint in &ring.waypoints {
                assert!((distance(centre(), *waypoint) - ring.radius_m).abs() < 0.05);
                assert_eq!(waypoint.altitude_m, 100.0);
            }
        }
    }

    #[test]
    fn zero_radius_is_empty() {
        assert!(generate_search_path(centre(), 0.0, (5.0, 5.0)).unwrap().is_empty());
    }

    #[test]
    fn radius_smaller_than_first_ring_is_empty() {
        assert!(generate_search_path(centre(), 2.0, (5.0, 5.0)).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        let cases = [
            generate_search_path(centre(), 10.0, (0.0, 5.0)),
            generate_search_path(centre(), 10.0, (5.0, -1.0)),
            generate_search_path(centre(), -1.0, (5.0, 5.0)),
            generate_search_path(centre(), f64::NAN, (5.0, 5.0)),
            generate_search_path_sector(centre(), 10.0, (5.0, 5.0), 2, 2),
            generate_search_path_sector(centre(), 10.0, (5.0, 5.0), 0, 0),
        ];
        for result in cases {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn rejects_oversized_pattern() {
        let err = generate_search_path(centre(), 1e5, (1e-4, 1e-4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let planner = CoveragePlanner {
            min_points_per_ring: usize::MAX,
            ..CoveragePlanner::default()
        };
        let err = planner.search_path(centre(), 10.0, (5.0, 5.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn large_but_bounded_pattern_is_planned() {
        let rings = CoveragePlanner::default()
            .rings(centre(), 2_000.0, (20.0, 20.0))
            .unwrap();
        assert_eq!(rings.len(), 100);
        let total: usize = rings.iter().map(|ring| ring.waypoints.len()).sum();
        assert!(total < MAX_SEARCH_WAYPOINTS);
    }

    #[test]
    fn rejects_bad_tuning() {
        let planner = CoveragePlanner {
            overlap_multiplier: 0.0,
            ..CoveragePlanner::default()
        };
        assert!(planner.search_path(centre(), 10.0, (5.0, 5.0)).is_err());

        let planner = CoveragePlanner {
            min_points_per_ring: 2,
            ..CoveragePlanner::default()
        };
        assert!(planner.search_path(centre(), 10.0, (5.0, 5.0)).is_err());
    }

    #[test]
    fn single_sector_equals_full_path() {
        let full = generate_search_path(centre(), 25.0, (5.0, 4.0)).unwrap();
        let sector = generate_search_path_sector(centre(), 25.0, (5.0, 4.0), 0, 1).unwrap();
        assert_eq!(full, sector);
    }

    #[test]
    fn sector_arcs_alternate_direction() {
        let planner = CoveragePlanner::default();
        let sector = SearchSector::new(1, 4).unwrap();
        let rings = planner.sector_rings(centre(), 20.0, (5.0, 5.0), sector).unwrap();
        let full = planner.rings(centre(), 20.0, (5.0, 5.0)).unwrap();
        for (arc, ring) in rings.iter().zip(&full) {
            let (first, end) = sector.point_range(ring.points_per_ring);
            let mut expected: Vec<Position> = (first..end)
                .map(|k| ring_point(centre(), ring.radius_m, k, ring.points_per_ring).unwrap())
                .collect();
            if arc.clockwise {
                expected.reverse();
            }
            assert_eq!(arc.waypoints, expected);
        }
    }
}
