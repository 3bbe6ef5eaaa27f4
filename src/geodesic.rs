//! Great-circle helpers on the unit sphere.
//!
//! All coordinates are in degrees. Nothing here validates ranges: longitudes
//! outside [-180, 180] are handled implicitly by the trigonometry.

/// A position on the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        GeoPoint { lon, lat }
    }

    /// Unit vector of the point, with the z axis through the north pole.
    fn to_cartesian(self) -> [f64; 3] {
        let (lon, lat) = (self.lon.to_radians(), self.lat.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    fn from_cartesian([x, y, z]: [f64; 3]) -> Self {
        GeoPoint {
            lon: y.atan2(x).to_degrees(),
            lat: z.atan2(x.hypot(y)).to_degrees(),
        }
    }
}

impl From<(i32, i32)> for GeoPoint {
    fn from((lon, lat): (i32, i32)) -> Self {
        GeoPoint::new(lon as f64, lat as f64)
    }
}

/// Midpoint of the great circle arc between `a` and `b`.
///
/// The returned longitude is relative to `a`, so it may fall outside
/// [-180, 180] by up to half a turn.
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let lat0 = a.lat.to_radians();
    let lat1 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let bx = lat1.cos() * dlon.cos();
    let by = lat1.cos() * dlon.sin();

    let lat_mid = (lat0.sin() + lat1.sin()).atan2(((lat0.cos() + bx).powi(2) + by.powi(2)).sqrt());
    let lon_mid = a.lon.to_radians() + by.atan2(lat0.cos() + bx);

    GeoPoint {
        lon: lon_mid.to_degrees(),
        lat: lat_mid.to_degrees(),
    }
}

/// Central angle between two points, in radians (haversine form).
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat0 = a.lat.to_radians();
    let lat1 = b.lat.to_radians();
    let dlat = lat1 - lat0;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat0.cos() * lat1.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Point at `fraction` of the way along the great circle from `a` to `b`.
///
/// Antipodal endpoints have no unique great circle; `a` is returned for them,
/// as it is for coincident points.
pub fn intermediate(a: GeoPoint, b: GeoPoint, fraction: f64) -> GeoPoint {
    let d = angular_distance(a, b);
    let sin_d = d.sin();
    if sin_d.abs() < 1e-12 {
        return a;
    }

    let wa = ((1.0 - fraction) * d).sin() / sin_d;
    let wb = (fraction * d).sin() / sin_d;
    let [ax, ay, az] = a.to_cartesian();
    let [bx, by, bz] = b.to_cartesian();

    GeoPoint::from_cartesian([wa * ax + wb * bx, wa * ay + wb * by, wa * az + wb * bz])
}

/// Densifies a polyline so that consecutive points are at most `max_step_deg`
/// apart along the great circle between the original vertices.
pub fn densify(points: &[GeoPoint], max_step_deg: f64) -> Vec<GeoPoint> {
    let mut out = Vec::with_capacity(points.len());
    let Some(first) = points.first() else {
        return out;
    };
    out.push(*first);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let ratio = angular_distance(a, b).to_degrees() / max_step_deg;
        let steps = (ratio - 1e-9).ceil().max(1.0) as usize;
        for step in 1..steps {
            out.push(intermediate(a, b, step as f64 / steps as f64));
        }
        out.push(b);
    }

    out
}

/// Wraps a longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: GeoPoint, b: GeoPoint) {
        assert!(
            (wrap_longitude(a.lon) - wrap_longitude(b.lon)).abs() < 1e-7 && (a.lat - b.lat).abs() < 1e-7,
            "{a:?} != {b:?}"
        );
    }

    fn cross([ax, ay, az]: [f64; 3], [bx, by, bz]: [f64; 3]) -> [f64; 3] {
        [ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx]
    }

    fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn should_return_same_point_for_self_midpoint() {
        for p in [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-45.0, 60.0),
            GeoPoint::new(170.0, -33.0),
            GeoPoint::new(12.0, 89.0),
        ] {
            assert_close(midpoint(p, p), p);
        }
    }

    #[test]
    fn should_find_equatorial_midpoint() {
        let m = midpoint(GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0));
        assert_close(m, GeoPoint::new(45.0, 0.0));
    }

    #[test]
    fn should_find_meridional_midpoint() {
        let m = midpoint(GeoPoint::new(20.0, 0.0), GeoPoint::new(20.0, 60.0));
        assert_close(m, GeoPoint::new(20.0, 30.0));
    }

    #[test]
    fn should_cross_antimeridian() {
        let m = midpoint(GeoPoint::new(-170.0, 0.0), GeoPoint::new(170.0, 0.0));
        assert!((wrap_longitude(m.lon).abs() - 180.0).abs() < 1e-7);
        assert!(m.lat.abs() < EPS);
    }

    #[test]
    fn should_not_average_coordinates_at_high_latitude() {
        let a = GeoPoint::new(0.0, 60.0);
        let b = GeoPoint::new(90.0, 60.0);
        let m = midpoint(a, b);

        assert!((m.lon - 45.0).abs() < 1e-7);
        // The arc bulges poleward of the parallel.
        assert!(m.lat > 65.0);
        assert!((angular_distance(a, m) - angular_distance(m, b)).abs() < 1e-9);
    }

    #[test]
    fn should_lie_on_connecting_great_circle() {
        let a = GeoPoint::new(-60.0, 25.0);
        let b = GeoPoint::new(15.0, -40.0);
        let m = midpoint(a, b);

        let normal = cross(a.to_cartesian(), b.to_cartesian());
        assert!(dot(normal, m.to_cartesian()).abs() < 1e-9);
        assert!((angular_distance(a, m) - angular_distance(a, b) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn should_interpolate_at_fractions() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(90.0, 0.0);

        assert_close(intermediate(a, b, 0.0), a);
        assert_close(intermediate(a, b, 1.0), b);
        assert_close(intermediate(a, b, 0.5), midpoint(a, b));
        assert_close(intermediate(a, b, 1.0 / 3.0), GeoPoint::new(30.0, 0.0));
    }

    #[test]
    fn should_densify_long_segments() {
        let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 0.0)];
        let dense = densify(&points, 1.0);

        assert_eq!(dense.len(), 11);
        assert_close(dense[5], GeoPoint::new(5.0, 0.0));
        assert_eq!(dense.last(), Some(&points[1]));
    }

    #[test]
    fn should_keep_short_segments() {
        let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.5, 0.0)];
        assert_eq!(densify(&points, 1.0), points.to_vec());
        assert!(densify(&[], 1.0).is_empty());
    }

    #[test]
    fn should_wrap_longitudes() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(45.0), 45.0);
    }
}
