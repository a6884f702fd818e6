//! Spatial math shared by the diversion router and the coverage planner.
//!
//! Distances are great-circle (haversine) meters. Intersection tests treat
//! (longitude, latitude) as planar coordinates, which holds over the few tens
//! of kilometres a single planning call covers. Longitudes in one test are
//! unwrapped against a common reference so shapes straddling the
//! antimeridian stay contiguous.

use crate::error::GeometryError;
use crate::models::Position;

/// Mean Earth radius used by [`distance`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude used by [`offset`] and polygon buffering.
pub const METERS_PER_DEG_LAT: f64 = 111_319.9;

/// `cos(latitude)` below this means the longitude scale is unusable.
const POLE_EPSILON: f64 = 1e-9;

/// Tolerances relative to the extent of the points being tested.
const REL_AREA_EPS: f64 = 1e-12;
const REL_LEN_EPS: f64 = 1e-9;

/// Edges shorter than this (meters) are rejected when buffering.
const MIN_EDGE_M: f64 = 1e-3;

/// Polygons smaller than this (square meters) have no usable outward normal.
const MIN_AREA_M2: f64 = 1e-6;

/// Sine of the angle below which consecutive edges count as parallel.
const PARALLEL_SIN_EPS: f64 = 1e-9;

/// Great-circle distance between two positions using the haversine formula.
///
/// Altitude is ignored.
///
/// # Arguments
/// * `a`, `b` - Positions in decimal degrees
///
/// # Returns
/// Distance in meters on a sphere of radius [`EARTH_RADIUS_M`]
pub fn distance(a: Position, b: Position) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total haversine length of a waypoint sequence.
pub fn path_length(path: &[Position]) -> f64 {
    path.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}

/// Move `origin` by a local east/north displacement in meters.
///
/// Uses a flat-earth step of [`METERS_PER_DEG_LAT`] per degree of latitude
/// and `METERS_PER_DEG_LAT * cos(latitude)` per degree of longitude.
///
/// # Arguments
/// * `origin` - Reference position; its altitude is kept
/// * `east_m` - Offset in meters (positive = east)
/// * `north_m` - Offset in meters (positive = north)
///
/// # Returns
/// The displaced position, longitude wrapped into [-180, 180]. Fails with
/// `InvalidInput` at the poles, for non-finite offsets, or when the latitude
/// is pushed past a pole.
pub fn offset(origin: Position, east_m: f64, north_m: f64) -> Result<Position, GeometryError> {
    let cos_lat = origin.latitude.to_radians().cos();
    if cos_lat.abs() < POLE_EPSILON {
        return Err(GeometryError::InvalidInput(format!(
            "cannot offset from latitude {}: longitude scale vanishes at the pole",
            origin.latitude
        )));
    }
    if !east_m.is_finite() || !north_m.is_finite() {
        return Err(GeometryError::InvalidInput(format!(
            "offset ({east_m}, {north_m}) is not finite"
        )));
    }

    let latitude = origin.latitude + north_m / METERS_PER_DEG_LAT;
    let longitude = wrap_longitude(origin.longitude + east_m / (METERS_PER_DEG_LAT * cos_lat));
    Position::new(latitude, longitude, origin.altitude_m)
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Whether segment `a1→a2` touches or crosses segment `b1→b2`.
///
/// Collinear overlap and touching count; segments that share an endpoint do
/// not, so consecutive polygon edges and paths ending on a vertex pass.
pub fn segments_intersect(a1: Position, a2: Position, b1: Position, b2: Position) -> bool {
    let ref_lon = a1.longitude;
    segments_touch_planar(
        planar(a1, ref_lon),
        planar(a2, ref_lon),
        planar(b1, ref_lon),
        planar(b2, ref_lon),
    )
}

/// Ray-casting containment test on planar (longitude, latitude).
///
/// Points exactly on the boundary may land on either side; callers that care
/// check [`on_boundary`] first.
pub fn point_in_polygon(point: Position, polygon: &[Position]) -> bool {
    let Some(ring) = planar_ring(polygon) else {
        return false;
    };
    inside_ring(planar(point, ring.ref_lon), &ring.points)
}

/// Whether `point` lies on one of the polygon's edges.
pub fn on_boundary(point: Position, polygon: &[Position]) -> bool {
    let Some(ring) = planar_ring(polygon) else {
        return false;
    };
    on_ring_boundary(planar(point, ring.ref_lon), &ring.points)
}

/// Whether segment `a→b` crosses the boundary of `polygon` or runs through
/// its interior. Running along an edge, or ending on a vertex, does not count.
pub fn segment_intersects_polygon(a: Position, b: Position, polygon: &[Position]) -> bool {
    let Some(ring) = planar_ring(polygon) else {
        return false;
    };
    let (pa, pb) = (planar(a, ring.ref_lon), planar(b, ring.ref_lon));
    let n = ring.points.len();
    let crosses_edge = (0..n)
        .any(|i| segments_touch_planar(pa, pb, ring.points[i], ring.points[(i + 1) % n]));
    if crosses_edge {
        return true;
    }

    // No boundary contact: the open segment is either fully inside or fully
    // outside, so its midpoint decides.
    let midpoint = ((pa.0 + pb.0) / 2.0, (pa.1 + pb.1) / 2.0);
    !on_ring_boundary(midpoint, &ring.points) && inside_ring(midpoint, &ring.points)
}

/// Offset `polygon` outward by `margin_m` meters with mitred corners.
///
/// Each edge is shifted along its outward normal and neighbouring shifted
/// edges are intersected to form the new corners. Works for either winding
/// and for concave outlines, as long as the offset outline stays simple.
///
/// # Arguments
/// * `polygon` - Open ring of at least 3 vertices in boundary order
/// * `margin_m` - Outward offset in meters; 0 returns the polygon unchanged
///
/// # Returns
/// A polygon with the same vertex count, order and per-vertex altitude.
/// Fails with `InvalidInput` for too few vertices, a bad margin, near-zero
/// edges or self-crossing input, and with `DegenerateGeometry` when the
/// polygon has no area or the buffered outline folds or crosses itself.
pub fn buffer_polygon(polygon: &[Position], margin_m: f64) -> Result<Vec<Position>, GeometryError> {
    let n = polygon.len();
    if n < 3 {
        return Err(GeometryError::InvalidInput(format!(
            "polygon needs at least 3 vertices, got {n}"
        )));
    }
    if !margin_m.is_finite() || margin_m < 0.0 {
        return Err(GeometryError::InvalidInput(format!(
            "buffer margin must be a non-negative number of meters, got {margin_m}"
        )));
    }
    for vertex in polygon {
        vertex.validate()?;
    }

    let frame = LocalFrame::centred_on(polygon)?;
    let points: Vec<(f64, f64)> = polygon.iter().map(|p| frame.project(*p)).collect();

    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        let (dx, dy) = (x2 - x1, y2 - y1);
        let len = dx.hypot(dy);
        if len < MIN_EDGE_M {
            return Err(GeometryError::InvalidInput(format!(
                "edge {i} has near-zero length ({len:.2e} m)"
            )));
        }
        edges.push((dx, dy, len));
    }

    if !is_simple(&points) {
        return Err(GeometryError::InvalidInput(
            "polygon edges cross each other".to_string(),
        ));
    }
    let area = signed_area(&points);
    if area.abs() < MIN_AREA_M2 {
        return Err(GeometryError::DegenerateGeometry(
            "polygon encloses no area".to_string(),
        ));
    }
    if margin_m == 0.0 {
        return Ok(polygon.to_vec());
    }

    // Counter-clockwise rings have the interior on the left, so outward is
    // the right-hand normal; clockwise rings the opposite.
    let side = if area > 0.0 { 1.0 } else { -1.0 };
    let normals: Vec<(f64, f64)> = edges
        .iter()
        .map(|&(dx, dy, len)| (side * dy / len, -side * dx / len))
        .collect();

    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let (pdx, pdy, plen) = edges[prev];
        let (cdx, cdy, clen) = edges[i];
        let (pnx, pny) = normals[prev];
        let (cnx, cny) = normals[i];

        // Offset line of the incoming edge passes through the shifted
        // previous vertex; the outgoing one through the shifted vertex.
        let p = (points[prev].0 + pnx * margin_m, points[prev].1 + pny * margin_m);
        let q = (points[i].0 + cnx * margin_m, points[i].1 + cny * margin_m);

        let denom = cross((pdx, pdy), (cdx, cdy));
        let corner = if denom.abs() / (plen * clen) < PARALLEL_SIN_EPS {
            if pdx * cdx + pdy * cdy < 0.0 {
                return Err(GeometryError::DegenerateGeometry(format!(
                    "edges meeting at vertex {i} fold back on each other"
                )));
            }
            q
        } else {
            let t = cross((q.0 - p.0, q.1 - p.1), (cdx, cdy)) / denom;
            (p.0 + t * pdx, p.1 + t * pdy)
        };
        corners.push(corner);
    }

    if !is_simple(&corners) {
        return Err(GeometryError::DegenerateGeometry(format!(
            "a {margin_m} m buffer makes the polygon outline cross itself"
        )));
    }

    corners
        .iter()
        .zip(polygon)
        .map(|(&(east, north), vertex)| frame.unproject(east, north, vertex.altitude_m))
        .collect()
}

/// Equirectangular tangent plane around a reference point, in meters.
///
/// [`LocalFrame::unproject`] is [`offset`] from the reference, so the
/// round trip is exact apart from floating point error.
#[derive(Debug, Clone, Copy)]
struct LocalFrame {
    origin: Position,
    meters_per_deg_lon: f64,
}

impl LocalFrame {
    fn centred_on(points: &[Position]) -> Result<Self, GeometryError> {
        let Some(first) = points.first() else {
            return Err(GeometryError::InvalidInput("no points to centre on".to_string()));
        };
        let count = points.len() as f64;
        let latitude = points.iter().map(|p| p.latitude).sum::<f64>() / count;
        let ref_lon = first.longitude;
        let mean_dlon = points
            .iter()
            .map(|p| wrap_longitude(p.longitude - ref_lon))
            .sum::<f64>()
            / count;
        let longitude = wrap_longitude(ref_lon + mean_dlon);
        let origin = Position::new(latitude, longitude, 0.0)?;
        let cos_lat = latitude.to_radians().cos();
        if cos_lat.abs() < POLE_EPSILON {
            return Err(GeometryError::InvalidInput(format!(
                "polygon centred on latitude {latitude} is too close to a pole"
            )));
        }
        Ok(Self {
            origin,
            meters_per_deg_lon: METERS_PER_DEG_LAT * cos_lat,
        })
    }

    fn project(&self, p: Position) -> (f64, f64) {
        let dlon = wrap_longitude(p.longitude - self.origin.longitude);
        (
            dlon * self.meters_per_deg_lon,
            (p.latitude - self.origin.latitude) * METERS_PER_DEG_LAT,
        )
    }

    fn unproject(&self, east_m: f64, north_m: f64, altitude_m: f64) -> Result<Position, GeometryError> {
        Ok(offset(self.origin, east_m, north_m)?.with_altitude(altitude_m))
    }
}

/// Planar (longitude, latitude) with the longitude unwrapped to within 180
/// degrees of `ref_lon`.
fn planar(p: Position, ref_lon: f64) -> (f64, f64) {
    (ref_lon + wrap_longitude(p.longitude - ref_lon), p.latitude)
}

struct PlanarRing {
    ref_lon: f64,
    points: Vec<(f64, f64)>,
}

/// `None` for fewer than 3 vertices.
fn planar_ring(polygon: &[Position]) -> Option<PlanarRing> {
    if polygon.len() < 3 {
        return None;
    }
    let ref_lon = polygon[0].longitude;
    Some(PlanarRing {
        ref_lon,
        points: polygon.iter().map(|p| planar(*p, ref_lon)).collect(),
    })
}

fn inside_ring((x, y): (f64, f64), ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn on_ring_boundary(p: (f64, f64), ring: &[(f64, f64)]) -> bool {
    let tolerance = REL_LEN_EPS * extent(ring).max(f64::MIN_POSITIVE);
    (0..ring.len()).any(|i| {
        let (s, e) = (ring[i], ring[(i + 1) % ring.len()]);
        point_segment_distance(p, s, e) <= tolerance
    })
}

/// Touching or crossing, except through a shared endpoint.
fn segments_touch_planar(a1: (f64, f64), a2: (f64, f64), b1: (f64, f64), b2: (f64, f64)) -> bool {
    let pts = [a1, a2, b1, b2];
    let scale = extent(&pts);
    if shares_endpoint(&pts, scale) {
        return false;
    }
    segments_cross_planar(a1, a2, b1, b2, scale)
}

fn extent(points: &[(f64, f64)]) -> f64 {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (max_x - min_x).max(max_y - min_y)
}

fn shares_endpoint(pts: &[(f64, f64); 4], scale: f64) -> bool {
    let tolerance = REL_LEN_EPS * scale;
    let same = |p: (f64, f64), q: (f64, f64)| {
        (p.0 - q.0).abs() <= tolerance && (p.1 - q.1).abs() <= tolerance
    };
    same(pts[0], pts[2]) || same(pts[0], pts[3]) || same(pts[1], pts[2]) || same(pts[1], pts[3])
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Orientation-based segment test, inclusive of touching and overlap.
/// `scale` is the extent of the four points; tolerances are relative to it.
fn segments_cross_planar(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
    scale: f64,
) -> bool {
    if scale <= 0.0 {
        return true;
    }
    let area_eps = REL_AREA_EPS * scale * scale;
    let len_eps = REL_LEN_EPS * scale;

    fn orient(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> f64 {
        (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
    }

    let within = |a: f64, b: f64, value: f64| {
        value >= a.min(b) - len_eps && value <= a.max(b) + len_eps
    };
    let on_segment = |p: (f64, f64), q: (f64, f64), r: (f64, f64)| {
        within(p.0, q.0, r.0) && within(p.1, q.1, r.1)
    };

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= area_eps && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= area_eps && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= area_eps && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= area_eps && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > area_eps && o2 < -area_eps) || (o1 < -area_eps && o2 > area_eps);
    let b_crosses = (o3 > area_eps && o4 < -area_eps) || (o3 < -area_eps && o4 > area_eps);
    a_crosses && b_crosses
}

fn point_segment_distance(p: (f64, f64), s: (f64, f64), e: (f64, f64)) -> f64 {
    let (sx, sy) = (e.0 - s.0, e.1 - s.1);
    let (px, py) = (p.0 - s.0, p.1 - s.1);
    let len_sq = sx * sx + sy * sy;
    if len_sq == 0.0 {
        return px.hypot(py);
    }
    let t = ((px * sx + py * sy) / len_sq).clamp(0.0, 1.0);
    (px - t * sx).hypot(py - t * sy)
}

/// Shoelace area; positive for counter-clockwise rings.
fn signed_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let mut twice = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice += points[i].0 * points[j].1 - points[j].0 * points[i].1;
    }
    twice / 2.0
}

/// No two non-adjacent edges of the closed ring touch.
fn is_simple(points: &[(f64, f64)]) -> bool {
    let n = points.len();
    let scale = extent(points);
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            let (a1, a2) = (points[i], points[(i + 1) % n]);
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_cross_planar(a1, a2, b1, b2, scale) {
                return false;
            }
        }
    }
    true
}
