use super::domain::Coordinates;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine great-circle distance in miles. Non-finite inputs propagate as
/// NaN; callers filter out records without coordinates before getting here.
pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Planar point-to-segment distance in degrees, used by the territory
/// matcher's edge-proximity fallback.
pub(crate) fn point_to_segment_degrees(point: Coordinates, a: Coordinates, b: Coordinates) -> f64 {
    let (px, py) = (point.longitude, point.latitude);
    let (ax, ay) = (a.longitude, a.latitude);
    let (bx, by) = (b.longitude, b.latitude);

    let dx = bx - ax;
    let dy = by - ay;
    let length_sq = dx * dx + dy * dy;

    // Degenerate segment: duplicate vertices are common in scan-pattern
    // polygons, so measure to the point itself.
    if length_sq == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
