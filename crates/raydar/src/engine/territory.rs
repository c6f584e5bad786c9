use super::domain::{Coordinates, Territory};
use super::geo;

/// Edge-proximity tolerance for the lenient fallback, roughly 100m.
const EDGE_TOLERANCE_DEGREES: f64 = 0.001;

/// Axis-aligned bounding box over a polygon boundary, planar degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoundingBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BoundingBox {
    fn from_boundary(boundary: &[Coordinates]) -> Option<Self> {
        let first = boundary.first()?;
        let mut bbox = Self {
            west: first.longitude,
            south: first.latitude,
            east: first.longitude,
            north: first.latitude,
        };
        for vertex in &boundary[1..] {
            bbox.west = bbox.west.min(vertex.longitude);
            bbox.south = bbox.south.min(vertex.latitude);
            bbox.east = bbox.east.max(vertex.longitude);
            bbox.north = bbox.north.max(vertex.latitude);
        }
        Some(bbox)
    }

    fn contains(&self, point: Coordinates) -> bool {
        point.longitude >= self.west
            && point.longitude <= self.east
            && point.latitude >= self.south
            && point.latitude <= self.north
    }
}

/// Returns the first territory whose boundary contains the point, in input
/// order. Territories are assumed non-overlapping by convention; overlaps are
/// not tie-broken. Degenerate boundaries (<3 vertices) are skipped.
pub fn find_territory(point: Coordinates, territories: &[Territory]) -> Option<&Territory> {
    territories
        .iter()
        .find(|territory| territory_contains(territory, point))
}

/// Exact ray-casting test first; on a miss, a bounding-box plus
/// edge-proximity fallback. Managers sometimes draw territories as "filled"
/// zigzag scan patterns whose collinear and duplicate vertices defeat strict
/// ray-casting, so points near any edge still match.
pub fn territory_contains(territory: &Territory, point: Coordinates) -> bool {
    let boundary = &territory.boundary;
    if boundary.len() < 3 || !point.is_finite() {
        return false;
    }

    let clean = boundary.iter().all(Coordinates::is_finite);
    if clean && ray_cast_contains(boundary, point) {
        return true;
    }

    // Non-finite vertices make the exact test meaningless; degrade to the
    // lenient path instead of rejecting the territory outright.
    match BoundingBox::from_boundary(boundary) {
        Some(bbox) if bbox.contains(point) => near_any_edge(boundary, point),
        _ => false,
    }
}

/// Even-odd ray casting over the implicitly closed boundary, treating
/// (longitude, latitude) as planar x/y.
fn ray_cast_contains(boundary: &[Coordinates], point: Coordinates) -> bool {
    let mut inside = false;
    let mut j = boundary.len() - 1;
    for i in 0..boundary.len() {
        let (xi, yi) = (boundary[i].longitude, boundary[i].latitude);
        let (xj, yj) = (boundary[j].longitude, boundary[j].latitude);

        let crosses = (yi > point.latitude) != (yj > point.latitude)
            && point.longitude < (xj - xi) * (point.latitude - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn near_any_edge(boundary: &[Coordinates], point: Coordinates) -> bool {
    let mut j = boundary.len() - 1;
    for i in 0..boundary.len() {
        let distance = geo::point_to_segment_degrees(point, boundary[j], boundary[i]);
        if distance.is_finite() && distance <= EDGE_TOLERANCE_DEGREES {
            return true;
        }
        j = i;
    }
    false
}
