//! Splits a path into per-vertex segments and colours each by its vertex.
//!
//! Every vertex owns the stretch of path between the midpoints to its
//! neighbours. Adjoining segments meet at a shared midpoint but keep their own
//! colour, so the colour changes halfway between measurements instead of at
//! them.

use image::Rgb;

use crate::{
    colormap::ColorScale,
    error::{ConveyorError, Result},
    geodesic::{midpoint, GeoPoint},
    table::Point,
};

/// Open paths have two endpoints; closed paths wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    Open,
    Closed,
}

impl PathShape {
    /// Shape of a conveyor path by id: path 1 is open, path 2 is a loop.
    pub fn of(path: u8) -> Result<Self> {
        match path {
            1 => Ok(PathShape::Open),
            2 => Ok(PathShape::Closed),
            other => Err(ConveyorError::UnknownPath(other as i64)),
        }
    }

    pub fn min_points(self) -> usize {
        match self {
            PathShape::Open => 2,
            PathShape::Closed => 1,
        }
    }
}

/// Index of a neighbour on a closed path of `len` points; `-1` is the last
/// point and `len` is the first.
pub fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// The stretch of path owned by the vertex at `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub center: usize,
    pub polyline: Vec<GeoPoint>,
    pub endpoint: bool,
}

/// Builds one segment per vertex, in path order.
pub fn path_segments(points: &[GeoPoint], shape: PathShape) -> Vec<Segment> {
    let len = points.len();
    match shape {
        PathShape::Open => {
            if len < 2 {
                return Vec::new();
            }
            let last = len - 1;
            let mut segments = Vec::with_capacity(len);
            segments.push(Segment {
                center: 0,
                polyline: vec![points[0], midpoint(points[0], points[1])],
                endpoint: true,
            });
            segments.extend((1..last).map(|i| interior(points, i - 1, i, i + 1)));
            segments.push(Segment {
                center: last,
                polyline: vec![points[last], midpoint(points[last], points[last - 1])],
                endpoint: true,
            });
            segments
        }
        PathShape::Closed => (0..len)
            .map(|i| {
                let prev = wrap_index(i as isize - 1, len);
                let next = wrap_index(i as isize + 1, len);
                interior(points, prev, i, next)
            })
            .collect(),
    }
}

fn interior(points: &[GeoPoint], prev: usize, center: usize, next: usize) -> Segment {
    Segment {
        center,
        polyline: vec![
            midpoint(points[prev], points[center]),
            points[center],
            midpoint(points[center], points[next]),
        ],
        endpoint: false,
    }
}

/// A segment ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredSegment {
    pub segment: Segment,
    pub anomaly: f64,
    pub color: Rgb<u8>,
}

/// Segments of one path coloured by each centre vertex's anomaly for `year`.
pub fn color_segments(
    path: u8,
    points: &[Point],
    year: i32,
    scale: &ColorScale,
) -> Result<Vec<ColoredSegment>> {
    let shape = PathShape::of(path)?;
    if points.len() < shape.min_points() {
        return Err(ConveyorError::PathTooShort {
            path,
            required: shape.min_points(),
            found: points.len(),
        });
    }

    let locations: Vec<GeoPoint> = points.iter().map(Point::location).collect();
    path_segments(&locations, shape)
        .into_iter()
        .map(|segment| {
            let anomaly = points[segment.center]
                .anomaly(year)
                .ok_or(ConveyorError::MissingAnomaly {
                    path,
                    index: segment.center,
                    year,
                })?;
            Ok(ColoredSegment {
                color: scale.color(anomaly),
                anomaly,
                segment,
            })
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------
