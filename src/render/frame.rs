//! One anomaly map per year.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::RgbImage;

use super::{
    colorbar::{draw_colorbar, ColorbarArea},
    parallels,
    text::{Align, Typeface},
    Canvas, FrameStyle, MapArea, BLACK, GRID,
};
use crate::{
    colormap::ColorScale,
    error::{ConveyorError, Result},
    geodesic::GeoPoint,
    projection::Robinson,
    segments::{color_segments, ColoredSegment, PathShape},
    table::{AnomalyTable, Point},
};

const OPEN_PATH: u8 = 1;
const CLOSED_PATH: u8 = 2;

const MERIDIAN_STEP: i32 = 60;
const PARALLEL_STEP: i32 = 30;

const CAPTION_SIZE: f32 = 18.0;
const TITLE_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 11.0;

/// Everything drawn on a frame's map, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayers {
    pub background: Vec<Vec<GeoPoint>>,
    pub endpoints: Vec<ColoredSegment>,
    pub interior: Vec<ColoredSegment>,
    pub loop_segments: Vec<ColoredSegment>,
}

/// Renders yearly frames from one table and one shared colour scale.
pub struct FrameRenderer<'a> {
    table: &'a AnomalyTable,
    scale: ColorScale,
    style: FrameStyle,
    typeface: &'a Typeface,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(
        table: &'a AnomalyTable,
        scale: ColorScale,
        style: FrameStyle,
        typeface: &'a Typeface,
    ) -> Self {
        FrameRenderer {
            table,
            scale,
            style,
            typeface,
        }
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn caption(&self) -> String {
        format!(
            "SST Difference Along Broecker's Ocean Conveyor Since {}",
            self.table.baseline()
        )
    }

    /// A blank canvas with the frame's layout and projection.
    pub fn canvas(&self) -> Canvas {
        let area = MapArea::fit(50.0, 58.0, 770.0, 400.0);
        let projection = Robinson::new(self.style.frame_central_longitude);
        Canvas::new(self.style.width, self.style.height, area, projection)
    }

    pub fn layers(&self, year: i32) -> Result<FrameLayers> {
        if !self.table.years().contains(&year) {
            return Err(ConveyorError::UnknownYear(year));
        }

        let open = self.table.path(OPEN_PATH)?;
        let closed = self.table.path(CLOSED_PATH)?;

        let (endpoints, interior): (Vec<ColoredSegment>, Vec<ColoredSegment>) =
            color_segments(OPEN_PATH, open, year, &self.scale)?
                .into_iter()
                .partition(|s| s.segment.endpoint);
        let loop_segments = color_segments(CLOSED_PATH, closed, year, &self.scale)?;

        Ok(FrameLayers {
            background: vec![
                background_line(open, PathShape::Open),
                background_line(closed, PathShape::Closed),
            ],
            endpoints,
            interior,
            loop_segments,
        })
    }

    pub fn render(&self, year: i32) -> Result<RgbImage> {
        let layers = self.layers(year)?;
        let mut canvas = self.canvas();
        let px = |points: f64| self.style.points_to_pixels(points);

        canvas.draw_outline(BLACK);

        for line in &layers.background {
            canvas.draw_geodesic(line, px(self.style.background_width), BLACK);
        }
        for s in &layers.endpoints {
            canvas.draw_geodesic(&s.segment.polyline, px(self.style.endpoint_width), s.color);
        }
        for s in layers.interior.iter().chain(&layers.loop_segments) {
            canvas.draw_geodesic(&s.segment.polyline, px(self.style.foreground_width), s.color);
        }

        canvas.draw_graticule(MERIDIAN_STEP, PARALLEL_STEP, GRID);
        self.draw_grid_labels(&mut canvas);

        let area = canvas.area();
        let bar = ColorbarArea {
            left: area.right() as i32 + 40,
            top: area.top as i32,
            width: 20,
            height: area.height as u32,
        };
        draw_colorbar(canvas.image_mut(), bar, &self.scale, self.typeface, LABEL_SIZE);

        let centre = (area.left + area.width / 2.0) as i32;
        let image = canvas.image_mut();
        self.typeface
            .draw(image, &year.to_string(), (centre, 34), TITLE_SIZE, Align::Center, BLACK);
        let middle = self.style.width as i32 / 2;
        self.typeface
            .draw(image, &self.caption(), (middle, 8), CAPTION_SIZE, Align::Center, BLACK);

        Ok(canvas.into_image())
    }

    /// Renders `year` and writes it to `<dir>/<year>.png`.
    pub fn save(&self, year: i32, dir: &Path) -> Result<PathBuf> {
        let image = self.render(year)?;
        fs::create_dir_all(dir)?;
        let file_path = dir.join(format!("{year}.png"));
        image.save(&file_path)?;
        Ok(file_path)
    }

    fn draw_grid_labels(&self, canvas: &mut Canvas) {
        let typeface = self.typeface;

        for lon in (-180..180).step_by(MERIDIAN_STEP as usize) {
            let (x, y) = canvas.locate(GeoPoint::new(lon as f64, -90.0));
            let at = (x as i32, y as i32 + 4);
            typeface.draw(canvas.image_mut(), &lon_label(lon), at, LABEL_SIZE, Align::Center, BLACK);
        }

        for lat in parallels(PARALLEL_STEP) {
            let (x, y) = canvas.locate_relative(-180.0, lat as f64);
            let at = (x as i32 - 4, y as i32 - LABEL_SIZE as i32 / 2);
            typeface.draw(canvas.image_mut(), &lat_label(lat), at, LABEL_SIZE, Align::Right, BLACK);
        }
    }
}

fn background_line(points: &[Point], shape: PathShape) -> Vec<GeoPoint> {
    let mut line: Vec<GeoPoint> = points.iter().map(Point::location).collect();
    if shape == PathShape::Closed {
        if let Some(&first) = line.first() {
            line.push(first);
        }
    }
    line
}

pub fn lon_label(lon: i32) -> String {
    match lon {
        0 => "0°".to_string(),
        180 | -180 => "180°".to_string(),
        lon if lon < 0 => format!("{}°W", -lon),
        lon => format!("{lon}°E"),
    }
}

pub fn lat_label(lat: i32) -> String {
    match lat {
        0 => "0°".to_string(),
        lat if lat < 0 => format!("{}°S", -lat),
        lat => format!("{lat}°N"),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{colormap::Colormap, table::SstTable};

    /// Four-point open path and three-point loop over two years.
    const TABLE: &str = "\
path,longitude,latitude,2000,2001
1,-80,20,20.0,20.5
1,-60,35,19.0,18.0
1,-40,45,15.0,15.25
1,-20,55,10.0,11.0
2,20,-40,12.0,13.5
2,100,-40,11.0,10.5
2,160,-50,8.0,8.0
";

    fn table() -> AnomalyTable {
        let sst = SstTable::from_reader(TABLE.as_bytes()).unwrap();
        AnomalyTable::from_sst(&sst, None).unwrap()
    }

    fn typeface() -> &'static Typeface {
        Box::leak(Box::new(Typeface::embedded().unwrap()))
    }

    fn renderer(table: &AnomalyTable) -> FrameRenderer<'_> {
        let scale = ColorScale::symmetric(table.max_abs(), Colormap::rdbu_r());
        FrameRenderer::new(table, scale, FrameStyle::default(), typeface())
    }

    fn dark_pixels(image: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y).0.iter().all(|&c| c < 128))
            .count()
    }

    #[test]
    fn should_split_layers_by_role() {
        let table = table();
        let layers = renderer(&table).layers(2001).unwrap();

        assert_eq!(layers.endpoints.len(), 2);
        assert_eq!(layers.interior.len(), 2);
        assert_eq!(layers.loop_segments.len(), 3);
        assert_eq!(layers.background[0].len(), 4);
        // Background of the loop returns to its start.
        assert_eq!(layers.background[1].len(), 4);
        assert_eq!(layers.background[1][0], layers.background[1][3]);
    }

    #[test]
    fn should_colour_sample_segment_from_its_anomaly() {
        let table = table();
        let renderer = renderer(&table);
        let layers = renderer.layers(2001).unwrap();

        assert_eq!(table.max_abs(), 1.5);
        let sample = &layers.loop_segments[0];
        assert_eq!(sample.anomaly, 1.5);
        assert_eq!(sample.color, Colormap::rdbu_r().lookup(1.0));
        assert_eq!(layers.interior[0].color, renderer.scale().color(-1.0));
    }

    #[test]
    fn should_render_neutral_baseline_frame() {
        let table = table();
        let renderer = renderer(&table);
        let layers = renderer.layers(2000).unwrap();
        let neutral = renderer.scale().color(0.0);

        assert!(layers
            .endpoints
            .iter()
            .chain(&layers.interior)
            .chain(&layers.loop_segments)
            .all(|s| s.anomaly == 0.0 && s.color == neutral));
    }

    #[test]
    fn should_draw_segment_colour_at_vertex() {
        let table = table();
        let renderer = renderer(&table);
        let image = renderer.render(2001).unwrap();

        let (x, y) = renderer.canvas().locate(GeoPoint::new(100.0, -40.0));
        let expected = renderer.scale().color(-0.5);
        assert_eq!(*image.get_pixel(x.round() as u32, y.round() as u32), expected);
    }

    #[test]
    fn should_draw_title_and_caption() {
        let table = table();
        let image = renderer(&table).render(2001).unwrap();

        assert!(dark_pixels(&image, 400..470, 30..54) > 0);
        assert!(dark_pixels(&image, 0..1000, 4..28) > 0);
        // Colorbar label below the bar.
        assert!(dark_pixels(&image, 800..1000, 455..480) > 0);
    }

    #[test]
    fn should_save_one_image_per_year() {
        let table = table();
        let renderer = renderer(&table);
        let dir = TempDir::new().unwrap();

        for &year in table.years() {
            let path = renderer.save(year, dir.path()).unwrap();
            assert_eq!(path, dir.path().join(format!("{year}.png")));
            let image = image::open(&path).unwrap();
            assert_eq!((image.width(), image.height()), (1000, 500));
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn should_reject_unknown_year() {
        let table = table();
        assert!(matches!(
            renderer(&table).render(1999),
            Err(ConveyorError::UnknownYear(1999))
        ));
    }

    #[test]
    fn should_fail_without_both_paths() {
        let sst = SstTable::from_reader("path,longitude,latitude,2000\n1,0,0,1.0\n1,10,0,2.0\n".as_bytes()).unwrap();
        let table = AnomalyTable::from_sst(&sst, None).unwrap();

        assert!(matches!(
            renderer(&table).render(2000),
            Err(ConveyorError::MissingPath(2))
        ));
    }

    #[test]
    fn should_caption_with_baseline() {
        let table = table();
        assert_eq!(
            renderer(&table).caption(),
            "SST Difference Along Broecker's Ocean Conveyor Since 2000"
        );
    }

    #[test]
    fn should_label_grid_lines() {
        assert_eq!(lon_label(0), "0°");
        assert_eq!(lon_label(-120), "120°W");
        assert_eq!(lon_label(60), "60°E");
        assert_eq!(lon_label(-180), "180°");
        assert_eq!(lat_label(-30), "30°S");
        assert_eq!(lat_label(60), "60°N");
        assert_eq!(lat_label(0), "0°");
    }
}
