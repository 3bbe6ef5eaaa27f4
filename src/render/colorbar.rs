//! Vertical colorbar for the shared anomaly scale.

use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

use super::{
    text::{Align, Typeface},
    BLACK,
};
use crate::colormap::ColorScale;

pub const LABEL: &str = "Change in SST (°C)";

/// Placement of the bar in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorbarArea {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Anomaly shown on a row of the bar: vmax at the top, vmin at the bottom.
pub fn row_value(scale: &ColorScale, row: u32, height: u32) -> f64 {
    if height <= 1 {
        return 0.0;
    }
    let t = row as f64 / (height - 1) as f64;
    scale.vmax() - t * (scale.vmax() - scale.vmin())
}

pub fn draw_colorbar(
    image: &mut RgbImage,
    area: ColorbarArea,
    scale: &ColorScale,
    typeface: &Typeface,
    font_size: f32,
) {
    for row in 0..area.height {
        let color = scale.color(row_value(scale, row, area.height));
        let y = area.top + row as i32;
        for x in area.left..area.left + area.width as i32 {
            put(image, x, y, color);
        }
    }
    draw_hollow_rect_mut(
        image,
        Rect::at(area.left, area.top).of_size(area.width, area.height),
        BLACK,
    );

    let right = area.left + area.width as i32;
    let ticks = [
        (0, scale.vmax()),
        (area.height as i32 / 2, 0.0),
        (area.height as i32 - 1, scale.vmin()),
    ];
    for (offset, value) in ticks {
        let y = area.top + offset;
        for x in right..right + 4 {
            put(image, x, y, BLACK);
        }
        let label = tick_label(value, scale.vmax());
        let text_y = y - (font_size / 2.0) as i32;
        typeface.draw(image, &label, (right + 6, text_y), font_size, Align::Left, BLACK);
    }

    let label_y = area.top + area.height as i32 + 6;
    typeface.draw(
        image,
        LABEL,
        (area.left + area.width as i32 / 2, label_y),
        font_size,
        Align::Center,
        BLACK,
    );
}

/// Formats a tick with enough decimals to keep two significant digits of
/// `max_abs`.
pub fn tick_label(value: f64, max_abs: f64) -> String {
    let decimals = if max_abs.is_finite() && max_abs > 0.0 {
        (1.0 - max_abs.log10().floor()).clamp(1.0, 6.0) as usize
    } else {
        1
    };
    format!("{value:.decimals$}")
}

fn put(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

// -- Tests -------------------------------------------------------------------
