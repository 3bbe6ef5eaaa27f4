//! Static figure of the conveyor's route, without anomaly data.

use std::{fs, path::Path};

use image::RgbImage;

use super::{Canvas, FrameStyle, MapArea, BLACK};
use crate::{
    error::{ConveyorError, Result},
    geodesic::GeoPoint,
    projection::Robinson,
    segments::PathShape,
    table::PathPoint,
};

/// Draws every path as a thick black geodesic line. Paths keep the order in
/// which their points are listed; closed paths return to their first point.
pub fn render_trace(points: &[PathPoint], style: &FrameStyle) -> Result<RgbImage> {
    let margin = 20.0;
    let area = MapArea::fit(
        margin,
        margin,
        style.width as f64 - 2.0 * margin,
        style.height as f64 - 2.0 * margin,
    );
    let projection = Robinson::new(style.trace_central_longitude);
    let mut canvas = Canvas::new(style.width, style.height, area, projection);
    canvas.draw_outline(BLACK);

    let width = style.points_to_pixels(style.trace_width);
    for path in [1u8, 2] {
        let mut line: Vec<GeoPoint> = points
            .iter()
            .filter(|p| p.path == path)
            .map(|p| GeoPoint::from((p.longitude, p.latitude)))
            .collect();
        if line.is_empty() {
            return Err(ConveyorError::MissingPath(path));
        }
        if PathShape::of(path)? == PathShape::Closed {
            line.push(line[0]);
        }
        canvas.draw_geodesic(&line, width, BLACK);
    }

    Ok(canvas.into_image())
}

pub fn save_trace(points: &[PathPoint], style: &FrameStyle, file_path: &Path) -> Result<()> {
    let image = render_trace(points, style)?;
    if let Some(dir) = file_path.parent() {
        fs::create_dir_all(dir)?;
    }
    image.save(file_path)?;
    Ok(())
}

// -- Tests -------------------------------------------------------------------
