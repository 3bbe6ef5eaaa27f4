//! Robinson world projection.
//!
//! Uses the published 5° table of parallel lengths and distances from the
//! equator, linearly interpolated between rows. Output is in unit-sphere
//! coordinates: x in [-X_MAX, X_MAX], y in [-Y_MAX, Y_MAX].

use std::f64::consts::PI;

use crate::geodesic::{wrap_longitude, GeoPoint};

/// (length of parallel, distance from equator) for 0°, 5°, ..., 90°.
const TABLE: [(f64, f64); 19] = [
    (1.0000, 0.0000),
    (0.9986, 0.0620),
    (0.9954, 0.1240),
    (0.9900, 0.1860),
    (0.9822, 0.2480),
    (0.9730, 0.3100),
    (0.9600, 0.3720),
    (0.9427, 0.4340),
    (0.9216, 0.4958),
    (0.8962, 0.5571),
    (0.8679, 0.6176),
    (0.8350, 0.6769),
    (0.7986, 0.7346),
    (0.7597, 0.7903),
    (0.7186, 0.8435),
    (0.6732, 0.8936),
    (0.6213, 0.9394),
    (0.5722, 0.9761),
    (0.5322, 1.0000),
];

const X_SCALE: f64 = 0.8487;
const Y_SCALE: f64 = 1.3523;

pub const X_MAX: f64 = X_SCALE * PI;
pub const Y_MAX: f64 = Y_SCALE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Robinson {
    pub central_longitude: f64,
}

impl Robinson {
    pub fn new(central_longitude: f64) -> Self {
        Robinson { central_longitude }
    }

    /// Longitude relative to the central meridian, in [-180, 180).
    pub fn relative_longitude(&self, lon: f64) -> f64 {
        wrap_longitude(lon - self.central_longitude)
    }

    pub fn project(&self, point: GeoPoint) -> (f64, f64) {
        self.project_relative(self.relative_longitude(point.lon), point.lat)
    }

    /// Projects a longitude already taken relative to the central meridian,
    /// so both map edges (-180 and +180) are reachable.
    pub fn project_relative(&self, rel_lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.clamp(-90.0, 90.0);
        let (plen, pdfe) = interpolate(lat.abs());
        let x = X_SCALE * plen * rel_lon.to_radians();
        let y = Y_SCALE * pdfe * lat.signum();
        (x, y)
    }

    /// Projects a densified polyline, splitting it where it crosses the map
    /// edge opposite the central meridian. Each part ends on the edge.
    pub fn project_polyline(&self, points: &[GeoPoint]) -> Vec<Vec<(f64, f64)>> {
        let mut parts = Vec::new();
        let mut current = Vec::new();
        let mut previous: Option<(f64, f64)> = None;

        for point in points {
            let rel = self.relative_longitude(point.lon);

            if let Some((prev_rel, prev_lat)) = previous {
                let jump = rel - prev_rel;
                if jump.abs() > 180.0 {
                    // Crossing the edge: close at one side, reopen at the other.
                    let edge = if jump < 0.0 { 180.0 } else { -180.0 };
                    let unwrapped = rel + 2.0 * edge;
                    let t = (edge - prev_rel) / (unwrapped - prev_rel);
                    let lat = prev_lat + t * (point.lat - prev_lat);

                    current.push(self.project_relative(edge, lat));
                    parts.push(std::mem::take(&mut current));
                    current.push(self.project_relative(-edge, lat));
                }
            }

            current.push(self.project_relative(rel, point.lat));
            previous = Some((rel, point.lat));
        }

        if !current.is_empty() {
            parts.push(current);
        }
        parts
    }
}

fn interpolate(abs_lat: f64) -> (f64, f64) {
    let position = abs_lat / 5.0;
    let index = (position.floor() as usize).min(TABLE.len() - 2);
    let t = position - index as f64;
    let (a, b) = (TABLE[index], TABLE[index + 1]);
    (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
}

// -- Tests -------------------------------------------------------------------
