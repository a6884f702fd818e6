//! Coverage search pattern contract tests.

use pathplan_core::{
    distance, generate_search_path, generate_search_path_sector, CameraModel, CoveragePlanner,
    Footprint, Position, SearchSector,
};

fn centre() -> Position {
    Position::new(0.0, 0.0, 100.0).unwrap()
}

fn sort_key(p: &Position) -> (u64, u64) {
    (p.latitude.to_bits(), p.longitude.to_bits())
}

#[test]
fn ring_count_for_ten_meter_radius() {
    let radius = 10.0;
    let footprint = Footprint::new(5.0, 5.0);
    let rings = CoveragePlanner::default()
        .rings(centre(), radius, footprint)
        .unwrap();

    let expected = ((radius - footprint.width_m / 2.0) / footprint.width_m).floor() as usize + 1;
    assert_eq!(rings.len(), expected);
    assert_eq!(rings.len(), 2);
    for ring in &rings {
        assert!(ring.points_per_ring >= 3);
    }
}

#[test]
fn first_ring_sits_half_a_footprint_out() {
    let path = generate_search_path(centre(), 10.0, (5.0, 5.0)).unwrap();
    assert!(!path.is_empty());

    let rings = CoveragePlanner::default()
        .rings(centre(), 10.0, (5.0, 5.0))
        .unwrap();
    let first = &rings[0];
    assert!(first.waypoints.len() >= 3);
    for waypoint in &first.waypoints {
        assert!((distance(centre(), *waypoint) - 2.5).abs() < 0.01);
    }
    assert_eq!(&path[..first.waypoints.len()], first.waypoints.as_slice());

    let total: usize = rings.iter().map(|ring| ring.waypoints.len()).sum();
    assert_eq!(path.len(), total);
}

#[test]
fn sectors_partition_every_ring() {
    let planner = CoveragePlanner::default();
    let full = planner.rings(centre(), 40.0, (5.0, 4.0)).unwrap();

    for drone_count in 1..=7u32 {
        let per_drone: Vec<_> = (0..drone_count)
            .map(|index| {
                planner
                    .sector_rings(
                        centre(),
                        40.0,
                        (5.0, 4.0),
                        SearchSector::new(index, drone_count).unwrap(),
                    )
                    .unwrap()
            })
            .collect();

        for ring in &full {
            let mut union: Vec<Position> = per_drone
                .iter()
                .flat_map(|rings| rings[ring.index].waypoints.iter().copied())
                .collect();
            let mut expected = ring.waypoints.clone();
            union.sort_by_key(sort_key);
            expected.sort_by_key(sort_key);
            assert_eq!(
                union, expected,
                "ring {} split across {drone_count} drones",
                ring.index
            );
        }
    }
}

#[test]
fn sector_paths_are_disjoint() {
    let a = generate_search_path_sector(centre(), 30.0, (5.0, 5.0), 0, 3).unwrap();
    let b = generate_search_path_sector(centre(), 30.0, (5.0, 5.0), 1, 3).unwrap();
    let c = generate_search_path_sector(centre(), 30.0, (5.0, 5.0), 2, 3).unwrap();
    let full = generate_search_path(centre(), 30.0, (5.0, 5.0)).unwrap();

    assert_eq!(a.len() + b.len() + c.len(), full.len());
    for p in &a {
        assert!(!b.contains(p) && !c.contains(p));
    }
}

#[test]
fn sector_stays_in_its_angular_slice() {
    let path = generate_search_path_sector(centre(), 30.0, (5.0, 5.0), 1, 4).unwrap();
    assert!(!path.is_empty());
    for p in &path {
        // Drone 1 of 4 covers 90..180 degrees: north-west quadrant.
        let angle = p.latitude.atan2(p.longitude).to_degrees();
        assert!((90.0 - 1e-6..180.0).contains(&angle), "angle {angle}");
    }
}

#[test]
fn footprint_from_camera_feeds_planner() {
    let footprint = CameraModel::default().nadir_footprint(30.0).unwrap();
    let path = generate_search_path(centre(), 60.0, footprint).unwrap();
    assert!(!path.is_empty());
    for p in &path {
        assert!(distance(centre(), *p) <= 60.0 + 0.1);
    }
}

#[test]
fn planner_settings_round_trip_through_json() {
    let json = r#"{"overlap_multiplier": 1.5, "min_points_per_ring": 6}"#;
    let planner: CoveragePlanner = serde_json::from_str(json).unwrap();
    let rings = planner.rings(centre(), 10.0, (5.0, 5.0)).unwrap();
    assert!(rings.iter().all(|ring| ring.points_per_ring >= 6));
}
