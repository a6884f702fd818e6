//! Shortest round-trip itinerary over a handful of targets.
//!
//! The vehicle leaves `origin`, visits at most `targets_per_trip` targets,
//! returns to `origin`, and repeats until every target has been visited.
//! Every visiting order is tried, so the target count is capped.

use crate::error::PlanError;
use crate::geometry::distance;
use crate::models::Position;
use std::cmp::Ordering;

/// Largest target count searched exhaustively (8! orders).
pub const MAX_ITINERARY_TARGETS: usize = 8;

/// Itineraries whose lengths differ by less than this (meters) are tied.
const TIE_EPS_M: f64 = 1e-6;

/// Shortest itinerary that starts and ends at `origin`, visiting every
/// target and returning to `origin` after each `targets_per_trip` targets.
///
/// The result starts and ends with `origin`, with `origin` also repeated
/// between trips. Among equally short itineraries the one whose target order
/// is lexicographically smallest by (latitude, longitude) wins.
pub fn plan_itinerary(
    origin: Position,
    targets: &[Position],
    targets_per_trip: usize,
) -> Result<Vec<Position>, PlanError> {
    origin.validate()?;
    for target in targets {
        target.validate()?;
    }
    if targets_per_trip == 0 {
        return Err(PlanError::InvalidInput(
            "targets per trip must be at least 1".to_string(),
        ));
    }
    if targets.len() > MAX_ITINERARY_TARGETS {
        return Err(PlanError::InvalidInput(format!(
            "{} targets exceed the exhaustive search limit of {MAX_ITINERARY_TARGETS}",
            targets.len()
        )));
    }

    let mut sorted = targets.to_vec();
    sorted.sort_by(lexicographic);

    // Lexicographic permutations of the sorted targets; the first shortest
    // order found is kept.
    let mut order: Vec<usize> = (0..sorted.len()).collect();
    let mut best_order = order.clone();
    let mut best_m = tour_length(origin, &order, &sorted, targets_per_trip);
    let mut tried = 1usize;
    while next_permutation(&mut order) {
        tried += 1;
        let length_m = tour_length(origin, &order, &sorted, targets_per_trip);
        if length_m < best_m - TIE_EPS_M {
            best_m = length_m;
            best_order.clone_from(&order);
        }
    }

    let mut path = vec![origin];
    for trip in best_order.chunks(targets_per_trip) {
        path.extend(trip.iter().map(|&i| sorted[i]));
        path.push(origin);
    }

    tracing::debug!(
        targets = targets.len(),
        orders_tried = tried,
        distance_m = best_m,
        "planned itinerary"
    );
    Ok(path)
}

/// Length of visiting `targets` in the given order, returning to `origin`
/// after each `targets_per_trip` of them.
pub fn itinerary_length(origin: Position, targets: &[Position], targets_per_trip: usize) -> f64 {
    let order: Vec<usize> = (0..targets.len()).collect();
    tour_length(origin, &order, targets, targets_per_trip.max(1))
}

fn tour_length(origin: Position, order: &[usize], targets: &[Position], per_trip: usize) -> f64 {
    order
        .chunks(per_trip)
        .map(|trip| {
            let legs: f64 = trip
                .windows(2)
                .map(|pair| distance(targets[pair[0]], targets[pair[1]]))
                .sum();
            let out = trip.first().map_or(0.0, |&i| distance(origin, targets[i]));
            let back = trip.last().map_or(0.0, |&i| distance(targets[i], origin));
            out + legs + back
        })
        .sum()
}

fn lexicographic(a: &Position, b: &Position) -> Ordering {
    a.latitude
        .total_cmp(&b.latitude)
        .then_with(|| a.longitude.total_cmp(&b.longitude))
}

/// Advance to the next lexicographic permutation; false after the last.
fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = (1..order.len()).rev().find(|&i| order[i - 1] < order[i]) else {
        return false;
    };
    let pivot = pivot - 1;
    let Some(successor) = (pivot + 1..order.len()).rev().find(|&j| order[j] > order[pivot]) else {
        return false;
    };
    order.swap(pivot, successor);
    order[pivot + 1..].reverse();
    true
}
