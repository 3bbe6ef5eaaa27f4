//! Raster rendering of conveyor maps.
//!
//! A [`Canvas`] owns the image and the mapping from the globe to pixels.
//! Lines are geodesics: each polyline is densified along great circles,
//! projected, split at the map edge and stroked with a round brush.

pub mod colorbar;
pub mod frame;
pub mod text;
pub mod trace;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::{
    geodesic::{densify, GeoPoint},
    projection::{Robinson, X_MAX, Y_MAX},
};

pub use frame::FrameRenderer;
pub use text::Typeface;
pub use trace::save_trace;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID: Rgb<u8> = Rgb([170, 170, 170]);

/// Maximum angular step between densified vertices, in degrees.
const DENSIFY_STEP: f64 = 1.0;

/// Sizes and widths for rendered figures. Line widths are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    pub width: u32,
    pub height: u32,
    pub dpi: f64,
    pub background_width: f64,
    pub foreground_width: f64,
    pub endpoint_width: f64,
    pub trace_width: f64,
    pub frame_central_longitude: f64,
    pub trace_central_longitude: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        FrameStyle {
            width: 1000,
            height: 500,
            dpi: 100.0,
            background_width: 11.0,
            foreground_width: 8.0,
            endpoint_width: 7.0,
            trace_width: 5.0,
            frame_central_longitude: 0.0,
            trace_central_longitude: 70.0,
        }
    }
}

impl FrameStyle {
    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}

/// Pixel rectangle that holds the projected globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl MapArea {
    /// Largest area with the projection's aspect ratio centred in the given box.
    pub fn fit(left: f64, top: f64, width: f64, height: f64) -> Self {
        let aspect = Y_MAX / X_MAX;
        let (w, h) = if width * aspect <= height {
            (width, width * aspect)
        } else {
            (height / aspect, height)
        };
        MapArea {
            left: left + (width - w) / 2.0,
            top: top + (height - h) / 2.0,
            width: w,
            height: h,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.left + (x + X_MAX) / (2.0 * X_MAX) * self.width,
            self.top + (Y_MAX - y) / (2.0 * Y_MAX) * self.height,
        )
    }
}

pub struct Canvas {
    image: RgbImage,
    area: MapArea,
    projection: Robinson,
}

impl Canvas {
    pub fn new(width: u32, height: u32, area: MapArea, projection: Robinson) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, WHITE),
            area,
            projection,
        }
    }

    pub fn area(&self) -> MapArea {
        self.area
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Pixel position of a point on the globe.
    pub fn locate(&self, point: GeoPoint) -> (f64, f64) {
        self.area.to_pixel(self.projection.project(point))
    }

    /// Pixel position of a point given relative to the central meridian.
    pub fn locate_relative(&self, rel_lon: f64, lat: f64) -> (f64, f64) {
        self.area.to_pixel(self.projection.project_relative(rel_lon, lat))
    }

    /// Draws the great-circle polyline through `points`.
    pub fn draw_geodesic(&mut self, points: &[GeoPoint], width: f64, color: Rgb<u8>) {
        let dense = densify(points, DENSIFY_STEP);
        for part in self.projection.project_polyline(&dense) {
            let pixels: Vec<(f64, f64)> = part.into_iter().map(|p| self.area.to_pixel(p)).collect();
            self.stroke(&pixels, width, color);
        }
    }

    /// Strokes a polyline given in pixel coordinates. Lines up to a pixel and
    /// a half wide are drawn as hairlines.
    pub fn stroke(&mut self, pixels: &[(f64, f64)], width: f64, color: Rgb<u8>) {
        if width <= 1.5 {
            for pair in pixels.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                draw_line_segment_mut(
                    &mut self.image,
                    (a.0 as f32, a.1 as f32),
                    (b.0 as f32, b.1 as f32),
                    color,
                );
            }
            return;
        }

        let radius = (width / 2.0).round().max(1.0);
        let spacing = (radius / 2.0).max(0.5);

        if let [only] = pixels {
            self.stamp(*only, radius, color);
        }
        for pair in pixels.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let length = (b.0 - a.0).hypot(b.1 - a.1);
            let steps = (length / spacing).ceil().max(1.0) as usize;
            for step in 0..=steps {
                let t = step as f64 / steps as f64;
                self.stamp((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)), radius, color);
            }
        }
    }

    fn stamp(&mut self, (x, y): (f64, f64), radius: f64, color: Rgb<u8>) {
        draw_filled_circle_mut(
            &mut self.image,
            (x.round() as i32, y.round() as i32),
            radius as i32,
            color,
        );
    }

    /// Draws the boundary of the globe.
    pub fn draw_outline(&mut self, color: Rgb<u8>) {
        let mut outline: Vec<(f64, f64)> = (-90..=90)
            .map(|lat| self.locate_relative(-180.0, lat as f64))
            .collect();
        outline.extend((-90..=90).rev().map(|lat| self.locate_relative(180.0, lat as f64)));
        outline.push(outline[0]);
        self.stroke(&outline, 1.0, color);
    }

    /// Draws meridians every `lon_step` and parallels every `lat_step` degrees.
    pub fn draw_graticule(&mut self, lon_step: i32, lat_step: i32, color: Rgb<u8>) {
        for lon in (-180..180).step_by(lon_step as usize) {
            let meridian: Vec<GeoPoint> = (-90..=90)
                .map(|lat| GeoPoint::new(lon as f64, lat as f64))
                .collect();
            let pixels: Vec<(f64, f64)> = meridian.iter().map(|&p| self.locate(p)).collect();
            self.stroke(&pixels, 1.0, color);
        }

        for lat in parallels(lat_step) {
            let pixels: Vec<(f64, f64)> = (-180..=180)
                .map(|rel| self.locate_relative(rel as f64, lat as f64))
                .collect();
            self.stroke(&pixels, 1.0, color);
        }
    }
}

/// Parallels strictly between the poles.
pub fn parallels(lat_step: i32) -> impl Iterator<Item = i32> {
    (-90 + lat_step..90).step_by(lat_step as usize)
}

// -- Tests -------------------------------------------------------------------
